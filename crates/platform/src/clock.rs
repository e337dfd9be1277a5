//! Clock sources, FLL targets and the per-deployment clock map
//!
//! The codec's clocking is a small tree:
//!
//! ```text
//!   MCLK1 (12.288 MHz) ──> FLL1 reference ──> FLL1 output (98.304 MHz)
//!                                                  │
//!                                              SYSCLK_1 ──> AIF1 (DAI clock)
//! ```
//!
//! Register domains and fields are opaque identifiers owned by the codec
//! driver. The machine driver never invents them; it looks them up in a
//! [`ClockMap`] supplied with the hardware variant.

/// Input selection for a clock network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// No source; the network is stopped
    None,
    /// External master clock pin (MCLK1)
    ExternalMasterClock,
    /// The codec's system clock (SYSCLK)
    SystemClock,
    /// The frequency-locked loop output
    Fll,
}

/// Reference input of an FLL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FllReference {
    /// No reference; the FLL is disabled
    None,
    /// External master clock pin (MCLK1)
    ExternalMasterClock,
}

impl From<FllReference> for ClockSource {
    fn from(reference: FllReference) -> Self {
        match reference {
            FllReference::None => Self::None,
            FllReference::ExternalMasterClock => Self::ExternalMasterClock,
        }
    }
}

/// Desired configuration of one FLL instance.
///
/// `reference_source = None` with a zero reference frequency means disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FllTarget {
    /// Reference input selection
    pub reference_source: FllReference,
    /// Reference input frequency in Hz
    pub reference_frequency_hz: u32,
    /// Synthesised output frequency in Hz
    pub output_frequency_hz: u32,
}

impl FllTarget {
    /// Lock to `output_hz` from the external master clock running at `mclk_hz`.
    #[must_use]
    pub const fn from_mclk(mclk_hz: u32, output_hz: u32) -> Self {
        Self {
            reference_source: FllReference::ExternalMasterClock,
            reference_frequency_hz: mclk_hz,
            output_frequency_hz: output_hz,
        }
    }

    /// The disabled configuration: no reference, zero frequency.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            reference_source: FllReference::None,
            reference_frequency_hz: 0,
            output_frequency_hz: 0,
        }
    }

    /// Returns `true` if this target describes a stopped FLL.
    pub const fn is_disabled(&self) -> bool {
        matches!(self.reference_source, FllReference::None) && self.reference_frequency_hz == 0
    }
}

/// Opaque register-domain identifier (one functional block, e.g. FLL1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct DomainId(pub u16);

/// Opaque field identifier within a register domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct FieldId(pub u16);

/// A `(domain, field)` pair addressed by one register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterField {
    /// Register domain
    pub domain: DomainId,
    /// Field within the domain
    pub field: FieldId,
}

impl RegisterField {
    /// Build a field address from raw identifiers.
    pub const fn new(domain: u16, field: u16) -> Self {
        Self {
            domain: DomainId(domain),
            field: FieldId(field),
        }
    }
}

/// Physical clock network being configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDomain {
    /// FLL reference input selection and frequency
    FllReference,
    /// FLL synthesised output frequency
    FllOutput,
    /// Codec system clock source
    SystemClock,
    /// Digital-audio interface clock
    DaiClock,
}

/// Immutable, per-deployment mapping from clock network to register field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockMap {
    /// FLL reference input
    pub fll_reference: RegisterField,
    /// FLL output
    pub fll_output: RegisterField,
    /// System clock source selection
    pub system_clock: RegisterField,
    /// DAI clock source selection
    pub dai_clock: RegisterField,
}

impl ClockMap {
    /// Look up the register field backing `domain`.
    pub const fn field(&self, domain: ClockDomain) -> RegisterField {
        match domain {
            ClockDomain::FllReference => self.fll_reference,
            ClockDomain::FllOutput => self.fll_output,
            ClockDomain::SystemClock => self.system_clock,
            ClockDomain::DaiClock => self.dai_clock,
        }
    }
}

/// Clock map of the CS47L35 reference deployment: FLL1, SYSCLK_1, AIF1.
///
/// Domains are register-block base addresses in the 16-bit map and fields
/// are offsets within the block. Every supported family places these blocks
/// at the same addresses, so the variant table shares this map.
pub const CS47L35_CLOCK_MAP: ClockMap = ClockMap {
    fll_reference: RegisterField::new(0x0170, 0x06),
    fll_output: RegisterField::new(0x0170, 0x02),
    system_clock: RegisterField::new(0x0100, 0x01),
    dai_clock: RegisterField::new(0x0500, 0x03),
};
