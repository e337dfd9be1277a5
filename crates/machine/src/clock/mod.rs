//! Codec clock control
//!
//! - [`fll`] - FLL enable/disable with the settle-time contract
//! - [`late_bind`] - one-shot attach of the DAI clock to SYSCLK and SYSCLK to the FLL

pub mod fll;
pub mod late_bind;

use platform::{ClockMap, RegisterField, RegisterInterface, RegisterValue};

pub use fll::FllController;
pub use late_bind::bind_system_clock;

/// Explicit hardware context handed to every clock operation.
///
/// Owns the codec's register interface and borrows the deployment's clock
/// map. There is no global handle: whoever holds the `CodecHandle` is the
/// only one writing clock registers.
pub struct CodecHandle<R> {
    /// Register access
    pub regs: R,
    /// Clock network → register field mapping
    pub clocks: &'static ClockMap,
}

impl<R: RegisterInterface> CodecHandle<R> {
    /// Wrap `regs` for the deployment described by `clocks`.
    pub const fn new(regs: R, clocks: &'static ClockMap) -> Self {
        Self { regs, clocks }
    }

    /// Write `value` to `target`.
    pub async fn write(&mut self, target: RegisterField, value: RegisterValue) -> Result<(), R::Error> {
        self.regs.write(target.domain, target.field, value).await
    }
}
