//! Codec variant lookup table
//!
//! Every Madera-family codec exposes two register maps over the same bus:
//! a 16-bit map for control registers and a 32-bit map for the DSP and
//! FLL ranges above it. The maps differ per family only in their extent.
//!
//! Variants are resolved through [`VARIANT_TABLE`] (identifier → descriptor)
//! so adding a part means adding a row, not touching the sequencing code.
//! Each row also carries the [`ClockMap`] the machine driver programs.
//!
//! | Family  | Parts            | Feature   |
//! |---------|------------------|-----------|
//! | CS47L15 | CS47L15          | `cs47l15` |
//! | CS47L35 | CS47L35          | `cs47l35` |
//! | CS47L85 | CS47L85, WM1840  | `cs47l85` |
//! | CS47L90 | CS47L90, CS47L91 | `cs47l90` |
//! | CS47L92 | CS47L92, CS47L93 | `cs47l92` |

use crate::clock::{ClockMap, CS47L35_CLOCK_MAP};

/// Supported Madera codec parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecVariant {
    /// CS47L15
    Cs47l15,
    /// CS47L35
    Cs47l35,
    /// CS47L85
    Cs47l85,
    /// CS47L90
    Cs47l90,
    /// CS47L91
    Cs47l91,
    /// CS47L92
    Cs47l92,
    /// CS47L93
    Cs47l93,
    /// WM1840 (CS47L85 family)
    Wm1840,
}

impl CodecVariant {
    /// All parts, in bus id-table order.
    pub const ALL: [Self; 8] = [
        Self::Cs47l15,
        Self::Cs47l35,
        Self::Cs47l85,
        Self::Cs47l90,
        Self::Cs47l91,
        Self::Cs47l92,
        Self::Cs47l93,
        Self::Wm1840,
    ];

    /// Bus id-table name (e.g. `"cs47l35"`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cs47l15 => "cs47l15",
            Self::Cs47l35 => "cs47l35",
            Self::Cs47l85 => "cs47l85",
            Self::Cs47l90 => "cs47l90",
            Self::Cs47l91 => "cs47l91",
            Self::Cs47l92 => "cs47l92",
            Self::Cs47l93 => "cs47l93",
            Self::Wm1840 => "wm1840",
        }
    }

    /// Resolve a bus id-table name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }

    /// Resolve a device-tree compatible string (`"cirrus,cs47l35"`).
    pub fn from_compatible(compatible: &str) -> Option<Self> {
        compatible
            .strip_prefix("cirrus,")
            .and_then(Self::from_name)
    }
}

impl core::fmt::Display for CodecVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Register-map shape for one register width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegmapConfig {
    /// Address width in bits
    pub reg_bits: u8,
    /// Padding between address and value, in bits
    pub pad_bits: u8,
    /// Value width in bits (16 or 32)
    pub val_bits: u8,
    /// Address increment between consecutive registers
    pub reg_stride: u8,
    /// Highest valid register address
    pub max_register: u32,
    /// Mask OR-ed into the first address byte for reads
    pub read_flag_mask: u8,
}

impl RegmapConfig {
    const fn spi_16bit(max_register: u32) -> Self {
        Self {
            reg_bits: 32,
            pad_bits: 16,
            val_bits: 16,
            reg_stride: 1,
            max_register,
            read_flag_mask: 0x80,
        }
    }

    const fn spi_32bit(max_register: u32) -> Self {
        Self {
            reg_bits: 32,
            pad_bits: 16,
            val_bits: 32,
            reg_stride: 2,
            max_register,
            read_flag_mask: 0x80,
        }
    }

    /// Number of value bytes on the wire.
    pub fn val_bytes(&self) -> usize {
        usize::from(self.val_bits / 8)
    }

    /// Returns `true` if `reg` is addressable in this map.
    pub fn accepts(&self, reg: u32) -> bool {
        reg <= self.max_register && reg.checked_rem(u32::from(self.reg_stride)) == Some(0)
    }
}

/// Configuration descriptor for one codec part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VariantDescriptor {
    /// Codec part
    pub variant: CodecVariant,
    /// Control register map
    pub regmap_16bit: &'static RegmapConfig,
    /// DSP / FLL register map
    pub regmap_32bit: &'static RegmapConfig,
    /// Clock network → register field mapping
    pub clocks: &'static ClockMap,
    /// `false` when the family's cargo feature is disabled
    pub enabled: bool,
}

static CS47L15_16BIT: RegmapConfig = RegmapConfig::spi_16bit(0x2fff);
static CS47L15_32BIT: RegmapConfig = RegmapConfig::spi_32bit(0x0019_5ffe);
static CS47L35_16BIT: RegmapConfig = RegmapConfig::spi_16bit(0x2fff);
static CS47L35_32BIT: RegmapConfig = RegmapConfig::spi_32bit(0x002b_3ffe);
static CS47L85_16BIT: RegmapConfig = RegmapConfig::spi_16bit(0x2fff);
static CS47L85_32BIT: RegmapConfig = RegmapConfig::spi_32bit(0x003f_dffe);
static CS47L90_16BIT: RegmapConfig = RegmapConfig::spi_16bit(0x2fff);
static CS47L90_32BIT: RegmapConfig = RegmapConfig::spi_32bit(0x003f_3ffe);
static CS47L92_16BIT: RegmapConfig = RegmapConfig::spi_16bit(0x2fff);
static CS47L92_32BIT: RegmapConfig = RegmapConfig::spi_32bit(0x002b_5ffe);

static MADERA_CLOCKS: ClockMap = CS47L35_CLOCK_MAP;

const fn row(
    variant: CodecVariant,
    regmap_16bit: &'static RegmapConfig,
    regmap_32bit: &'static RegmapConfig,
    enabled: bool,
) -> VariantDescriptor {
    VariantDescriptor {
        variant,
        regmap_16bit,
        regmap_32bit,
        clocks: &MADERA_CLOCKS,
        enabled,
    }
}

/// Identifier → configuration descriptor, one row per part.
pub static VARIANT_TABLE: &[VariantDescriptor] = &[
    row(CodecVariant::Cs47l15, &CS47L15_16BIT, &CS47L15_32BIT, cfg!(feature = "cs47l15")),
    row(CodecVariant::Cs47l35, &CS47L35_16BIT, &CS47L35_32BIT, cfg!(feature = "cs47l35")),
    row(CodecVariant::Cs47l85, &CS47L85_16BIT, &CS47L85_32BIT, cfg!(feature = "cs47l85")),
    row(CodecVariant::Wm1840, &CS47L85_16BIT, &CS47L85_32BIT, cfg!(feature = "cs47l85")),
    row(CodecVariant::Cs47l90, &CS47L90_16BIT, &CS47L90_32BIT, cfg!(feature = "cs47l90")),
    row(CodecVariant::Cs47l91, &CS47L90_16BIT, &CS47L90_32BIT, cfg!(feature = "cs47l90")),
    row(CodecVariant::Cs47l92, &CS47L92_16BIT, &CS47L92_32BIT, cfg!(feature = "cs47l92")),
    row(CodecVariant::Cs47l93, &CS47L92_16BIT, &CS47L92_32BIT, cfg!(feature = "cs47l92")),
];

/// Find the descriptor row for `variant`.
pub fn descriptor(variant: CodecVariant) -> Option<&'static VariantDescriptor> {
    VARIANT_TABLE.iter().find(|d| d.variant == variant)
}
