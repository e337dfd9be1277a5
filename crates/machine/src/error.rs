//! Machine driver error types

use crate::config::ConfigError;

/// FLL programming failures.
///
/// Register-level errors are not preserved: any [`RegisterInterface`]
/// failure becomes [`ClockError::RejectedByHardware`].
///
/// [`RegisterInterface`]: platform::RegisterInterface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The codec refused the requested reference/output combination
    RejectedByHardware,
    /// `enable` called while the FLL is already running
    AlreadyActive,
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for ClockError {}

impl core::fmt::Display for ClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RejectedByHardware => write!(f, "Clock configuration rejected by hardware"),
            Self::AlreadyActive => write!(f, "FLL already active"),
        }
    }
}

/// Card probe and registration failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CardError {
    /// No matching board node
    NoDevice,
    /// Board node has no `i2s-controller` reference
    MissingI2sController,
    /// Card configuration is invalid
    Config(ConfigError),
    /// Attaching the DAI to the system clock failed
    ClockBind(ClockError),
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for CardError {}

impl core::fmt::Display for CardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoDevice => write!(f, "No matching board node"),
            Self::MissingI2sController => write!(f, "Property 'i2s-controller' missing or invalid"),
            Self::Config(e) => write!(f, "Invalid card configuration: {e}"),
            Self::ClockBind(e) => write!(f, "System clock bind failed: {e}"),
        }
    }
}

impl From<ConfigError> for CardError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            std::format!("{}", CardError::ClockBind(ClockError::RejectedByHardware)),
            "System clock bind failed: Clock configuration rejected by hardware"
        );
        assert_eq!(std::format!("{}", ClockError::AlreadyActive), "FLL already active");
    }

    #[test]
    fn config_error_converts() {
        let e: CardError = ConfigError::ZeroClock.into();
        assert_eq!(e, CardError::Config(ConfigError::ZeroClock));
    }
}
