//! Register access abstraction
//!
//! [`RegisterInterface`] is the only way the machine driver touches the codec.
//! Implementations validate the write and may reject it; the caller decides
//! what a rejection means.

use crate::clock::{ClockSource, DomainId, FieldId};

/// Value written to a clock register field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterValue {
    /// Select `source` for the network, running at `frequency_hz`
    /// (0 = rate negotiated later, or stopped when `source` is `None`).
    Clock {
        /// Input selection
        source: ClockSource,
        /// Frequency in Hz
        frequency_hz: u32,
    },
    /// A plain target frequency in Hz.
    Rate(u32),
}

/// Register interface trait
pub trait RegisterInterface {
    /// Error type
    type Error: core::fmt::Debug;

    /// Write `value` to `field` of `domain`.
    ///
    /// A failed write is final: the implementation must not retry on its own.
    fn write(
        &mut self,
        domain: DomainId,
        field: FieldId,
        value: RegisterValue,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// Hardware register errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareError {
    /// Device did not acknowledge in time
    Timeout,
    /// Bus-level communication error
    Bus,
    /// The requested state change is not allowed (e.g. invalid frequency ratio)
    InvalidTransition,
    /// Domain or field not present on this device
    InvalidRegister,
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for HardwareError {}

impl core::fmt::Display for HardwareError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "Register write timed out"),
            Self::Bus => write!(f, "Register bus error"),
            Self::InvalidTransition => write!(f, "Invalid register state transition"),
            Self::InvalidRegister => write!(f, "No such register field"),
        }
    }
}
