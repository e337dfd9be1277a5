//! Card clock configuration
//!
//! The reference deployment runs the codec SYSCLK at its maximum rate,
//! synthesised by FLL1 from a 12.288 MHz MCLK (256 × 48 kHz):
//!
//! ```text
//! MCLK1 12.288 MHz ──(×8)──> FLL1 98.304 MHz ──> SYSCLK_1
//! ```
//!
//! The FLL needs 1–2 ms after programming before it is locked. Audio data
//! clocked before then is garbage, so the settle wait is not optional.

use platform::FllTarget;

/// Maximum codec system clock (FLL output), in Hz.
pub const MAX_SYSCLK_HZ: u32 = 98_304_000;

/// External master clock feeding the FLL reference, in Hz.
pub const MCLK_HZ: u32 = 12_288_000;

/// Shortest allowed FLL settle wait, in µs.
pub const FLL_SETTLE_MIN_US: u32 = 1_000;

/// Longest allowed FLL settle wait, in µs.
pub const FLL_SETTLE_MAX_US: u32 = 2_000;

const _: () = assert!(matches!(MAX_SYSCLK_HZ.checked_rem(MCLK_HZ), Some(0)));
const _: () = assert!(FLL_SETTLE_MIN_US <= FLL_SETTLE_MAX_US);

/// Configuration validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Settle wait outside `FLL_SETTLE_MIN_US..=FLL_SETTLE_MAX_US`
    SettleOutOfRange {
        /// Requested wait in µs
        settle_us: u32,
    },
    /// A clock frequency is zero
    ZeroClock,
    /// SYSCLK is not an integer multiple of MCLK
    SysclkNotMultiple {
        /// Requested SYSCLK in Hz
        sysclk_hz: u32,
        /// Requested MCLK in Hz
        mclk_hz: u32,
    },
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SettleOutOfRange { settle_us } => write!(
                f,
                "FLL settle time {settle_us} us outside {FLL_SETTLE_MIN_US}..={FLL_SETTLE_MAX_US} us"
            ),
            Self::ZeroClock => write!(f, "Clock frequency must be non-zero"),
            Self::SysclkNotMultiple { sysclk_hz, mclk_hz } => {
                write!(f, "SYSCLK {sysclk_hz} Hz is not a multiple of MCLK {mclk_hz} Hz")
            }
        }
    }
}

/// Clock parameters for one card instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CardConfig {
    /// FLL output / codec SYSCLK in Hz
    pub sysclk_hz: u32,
    /// FLL reference (MCLK1) in Hz
    pub mclk_hz: u32,
    /// Wait after programming the FLL before it counts as locked, in µs
    pub settle_us: u32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            sysclk_hz: MAX_SYSCLK_HZ,
            mclk_hz: MCLK_HZ,
            settle_us: FLL_SETTLE_MIN_US,
        }
    }
}

impl CardConfig {
    /// The FLL configuration applied on every `Prepare`.
    pub const fn fll_target(&self) -> FllTarget {
        FllTarget::from_mclk(self.mclk_hz, self.sysclk_hz)
    }

    /// Check the configuration before it reaches hardware.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(FLL_SETTLE_MIN_US..=FLL_SETTLE_MAX_US).contains(&self.settle_us) {
            return Err(ConfigError::SettleOutOfRange {
                settle_us: self.settle_us,
            });
        }
        if self.sysclk_hz == 0 || self.mclk_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if self.sysclk_hz.checked_rem(self.mclk_hz) != Some(0) {
            return Err(ConfigError::SysclkNotMultiple {
                sysclk_hz: self.sysclk_hz,
                mclk_hz: self.mclk_hz,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::FllReference;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(CardConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_target_locks_mclk_to_max_sysclk() {
        let t = CardConfig::default().fll_target();
        assert_eq!(t.reference_source, FllReference::ExternalMasterClock);
        assert_eq!(t.reference_frequency_hz, 12_288_000);
        assert_eq!(t.output_frequency_hz, 98_304_000);
    }

    #[test]
    fn settle_bounds_are_inclusive() {
        for settle_us in [FLL_SETTLE_MIN_US, 1_500, FLL_SETTLE_MAX_US] {
            let cfg = CardConfig {
                settle_us,
                ..CardConfig::default()
            };
            assert_eq!(cfg.validate(), Ok(()));
        }
        for settle_us in [0, 999, 2_001] {
            let cfg = CardConfig {
                settle_us,
                ..CardConfig::default()
            };
            assert_eq!(cfg.validate(), Err(ConfigError::SettleOutOfRange { settle_us }));
        }
    }

    #[test]
    fn zero_clocks_are_rejected() {
        let cfg = CardConfig {
            mclk_hz: 0,
            ..CardConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroClock));
    }

    #[test]
    fn sysclk_must_be_a_multiple_of_mclk() {
        let cfg = CardConfig {
            mclk_hz: 11_289_600,
            ..CardConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::SysclkNotMultiple {
                sysclk_hz: 98_304_000,
                mclk_hz: 11_289_600
            })
        );
    }
}
