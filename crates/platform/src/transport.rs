//! SPI register-map transport for Madera codecs.
//!
//! Both register maps share one SPI device. A frame is:
//!
//! ```text
//! | address (32-bit BE) | padding (16 bits) | value (16 or 32 bits BE) |
//! ```
//!
//! Reads set the map's `read_flag_mask` in the first address byte and clock
//! the value back in the same chip-select window.
//!
//! [`bootstrap`] picks the register-width configurations for the detected
//! variant from [`VARIANT_TABLE`](crate::variant::VARIANT_TABLE) and returns
//! the register-access handle.
//!
//! # Clock field encoding
//!
//! As a [`RegisterInterface`], the bus turns each clock field write into one
//! 16-bit register write at `domain + field`:
//!
//! ```text
//! bit  15..11  10..8   7   6    5..4  3..0
//!      0       FREQ    0   ENA  0     SRC
//! ```
//!
//! `SRC` follows the SYSCLK_SRC codes (MCLK1 = 0, FLL1 = 4, SYSCLK = 8).
//! `FREQ` is 0 for "unspecified" or one of the Madera system rates
//! (1 = 6.144 MHz ... 7 = 147.456 MHz). `ENA` is set for every source other
//! than [`ClockSource::None`], which writes all zeros.

use embedded_hal_async::spi::{Error as _, ErrorKind, Operation, SpiDevice};

use crate::clock::{ClockMap, ClockSource, DomainId, FieldId};
use crate::register::{RegisterInterface, RegisterValue};
use crate::variant::{self, CodecVariant, RegmapConfig};

/// Bytes of address + padding in every frame.
const HEADER_LEN: usize = 6;

const CLK_ENA: u16 = 0x0040;
const CLK_FREQ_SHIFT: u32 = 8;

/// Encodable rates, in `FREQ` code order starting at 1.
const SYSTEM_RATES_HZ: [u32; 7] = [
    6_144_000,
    12_288_000,
    24_576_000,
    49_152_000,
    73_728_000,
    98_304_000,
    147_456_000,
];

/// Bootstrap failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootstrapError {
    /// Identifier does not name a known part
    UnknownVariant,
    /// Part is known but its family is compiled out
    Unsupported(CodecVariant),
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for BootstrapError {}

impl core::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownVariant => write!(f, "Unknown Madera device type"),
            Self::Unsupported(v) => write!(f, "Build does not include support for {v}"),
        }
    }
}

/// Register access failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// SPI bus error
    Spi(ErrorKind),
    /// Address not aligned to the map's register stride
    Misaligned {
        /// Offending address
        reg: u32,
    },
    /// Address beyond the map's last register
    OutOfRange {
        /// Offending address
        reg: u32,
    },
    /// Frequency has no `FREQ` code
    UnsupportedRate {
        /// Requested frequency in Hz
        hz: u32,
    },
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for TransportError {}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(kind) => write!(f, "SPI error: {kind}"),
            Self::Misaligned { reg } => write!(f, "Register {reg:#x} is not stride-aligned"),
            Self::OutOfRange { reg } => write!(f, "Register {reg:#x} is out of range"),
            Self::UnsupportedRate { hz } => write!(f, "No rate code for {hz} Hz"),
        }
    }
}

/// Register-access handle for one Madera codec.
pub struct MaderaBus<S> {
    spi: S,
    variant: CodecVariant,
    regmap_16bit: &'static RegmapConfig,
    regmap_32bit: &'static RegmapConfig,
    clocks: &'static ClockMap,
}

/// Build the register-access handle for `variant`.
///
/// # Errors
/// [`BootstrapError::Unsupported`] if the variant's family is compiled out.
pub fn bootstrap<S: SpiDevice>(spi: S, variant: CodecVariant) -> Result<MaderaBus<S>, BootstrapError> {
    let desc = variant::descriptor(variant).ok_or(BootstrapError::UnknownVariant)?;
    if !desc.enabled {
        return Err(BootstrapError::Unsupported(variant));
    }
    Ok(MaderaBus {
        spi,
        variant,
        regmap_16bit: desc.regmap_16bit,
        regmap_32bit: desc.regmap_32bit,
        clocks: desc.clocks,
    })
}

/// Build the register-access handle from a bus id-table name (`"cs47l35"`).
///
/// # Errors
/// [`BootstrapError::UnknownVariant`] for unrecognised names, otherwise as
/// [`bootstrap`].
pub fn bootstrap_named<S: SpiDevice>(spi: S, name: &str) -> Result<MaderaBus<S>, BootstrapError> {
    let variant = CodecVariant::from_name(name).ok_or(BootstrapError::UnknownVariant)?;
    bootstrap(spi, variant)
}

fn check(map: &RegmapConfig, reg: u32) -> Result<(), TransportError> {
    if reg > map.max_register {
        Err(TransportError::OutOfRange { reg })
    } else if !map.accepts(reg) {
        Err(TransportError::Misaligned { reg })
    } else {
        Ok(())
    }
}

fn rate_code(hz: u32) -> Result<u16, TransportError> {
    if hz == 0 {
        return Ok(0);
    }
    SYSTEM_RATES_HZ
        .iter()
        .zip(1u16..)
        .find_map(|(&rate, code)| (rate == hz).then_some(code))
        .ok_or(TransportError::UnsupportedRate { hz })
}

fn source_code(source: ClockSource) -> u16 {
    match source {
        ClockSource::None | ClockSource::ExternalMasterClock => 0x0,
        ClockSource::Fll => 0x4,
        ClockSource::SystemClock => 0x8,
    }
}

/// 16-bit register image of a clock field value.
fn encode(value: RegisterValue) -> Result<u16, TransportError> {
    match value {
        RegisterValue::Clock {
            source: ClockSource::None,
            ..
        } => Ok(0),
        RegisterValue::Clock {
            source,
            frequency_hz,
        } => Ok(rate_code(frequency_hz)?.wrapping_shl(CLK_FREQ_SHIFT) | CLK_ENA | source_code(source)),
        RegisterValue::Rate(hz) => Ok(rate_code(hz)?.wrapping_shl(CLK_FREQ_SHIFT) | CLK_ENA),
    }
}

fn header(map: &RegmapConfig, reg: u32, read: bool) -> [u8; HEADER_LEN] {
    let [a0, a1, a2, a3] = reg.to_be_bytes();
    let a0 = if read { a0 | map.read_flag_mask } else { a0 };
    [a0, a1, a2, a3, 0, 0]
}

impl<S: SpiDevice> MaderaBus<S> {
    /// The part this handle was bootstrapped for.
    pub fn variant(&self) -> CodecVariant {
        self.variant
    }

    /// Control register map configuration.
    pub fn regmap_16bit(&self) -> &'static RegmapConfig {
        self.regmap_16bit
    }

    /// DSP / FLL register map configuration.
    pub fn regmap_32bit(&self) -> &'static RegmapConfig {
        self.regmap_32bit
    }

    /// Clock field mapping for this part.
    pub fn clocks(&self) -> &'static ClockMap {
        self.clocks
    }

    /// Write a 16-bit register.
    pub async fn write16(&mut self, reg: u32, value: u16) -> Result<(), TransportError> {
        check(self.regmap_16bit, reg)?;
        let [h0, h1, h2, h3, h4, h5] = header(self.regmap_16bit, reg, false);
        let [v0, v1] = value.to_be_bytes();
        self.spi
            .write(&[h0, h1, h2, h3, h4, h5, v0, v1])
            .await
            .map_err(|e| TransportError::Spi(e.kind()))
    }

    /// Write a 32-bit register.
    pub async fn write32(&mut self, reg: u32, value: u32) -> Result<(), TransportError> {
        check(self.regmap_32bit, reg)?;
        let [h0, h1, h2, h3, h4, h5] = header(self.regmap_32bit, reg, false);
        let [v0, v1, v2, v3] = value.to_be_bytes();
        self.spi
            .write(&[h0, h1, h2, h3, h4, h5, v0, v1, v2, v3])
            .await
            .map_err(|e| TransportError::Spi(e.kind()))
    }

    /// Read a 16-bit register.
    pub async fn read16(&mut self, reg: u32) -> Result<u16, TransportError> {
        check(self.regmap_16bit, reg)?;
        let hdr = header(self.regmap_16bit, reg, true);
        let mut buf = [0u8; 2];
        self.spi
            .transaction(&mut [Operation::Write(&hdr), Operation::Read(&mut buf)])
            .await
            .map_err(|e| TransportError::Spi(e.kind()))?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read a 32-bit register.
    pub async fn read32(&mut self, reg: u32) -> Result<u32, TransportError> {
        check(self.regmap_32bit, reg)?;
        let hdr = header(self.regmap_32bit, reg, true);
        let mut buf = [0u8; 4];
        self.spi
            .transaction(&mut [Operation::Write(&hdr), Operation::Read(&mut buf)])
            .await
            .map_err(|e| TransportError::Spi(e.kind()))?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Give the SPI device back (device removal).
    pub fn release(self) -> S {
        self.spi
    }
}

impl<S: SpiDevice> RegisterInterface for MaderaBus<S> {
    type Error = TransportError;

    async fn write(
        &mut self,
        domain: DomainId,
        field: FieldId,
        value: RegisterValue,
    ) -> Result<(), Self::Error> {
        let reg = u32::from(domain.0).saturating_add(u32::from(field.0));
        let image = encode(value)?;
        self.write16(reg, image).await
    }
}
