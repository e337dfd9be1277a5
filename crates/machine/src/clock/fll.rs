//! FLL controller
//!
//! Programs one FLL instance through two register writes, reference first:
//!
//! ```text
//! enable:  fll_reference <- Clock { MCLK1, 12.288 MHz }
//!          fll_output    <- Rate(98.304 MHz)
//!          wait settle_us
//! disable: fll_reference <- Clock { None, 0 }
//! ```
//!
//! `enable` does not return `Ok` until the settle wait has elapsed, so a
//! caller seeing success may start clocking audio immediately.
//!
//! The controller keeps its own `active` flag. A failed enable leaves it
//! cleared even if the first write landed; a disable clears it whatever
//! the hardware answers, once the write has completed.
//!
//! Rejected writes are logged at debug level only. The caller decides how
//! loud a failure is.

use embedded_hal_async::delay::DelayNs;
use platform::{ClockMap, FllTarget, RegisterField, RegisterInterface, RegisterValue};

use super::CodecHandle;
use crate::error::ClockError;

/// Controller for one FLL instance.
pub struct FllController<D> {
    reference: RegisterField,
    output: RegisterField,
    delay: D,
    settle_us: u32,
    active: bool,
}

impl<D: DelayNs> FllController<D> {
    /// Controller for the FLL described by `clocks`, waiting `settle_us`
    /// after every successful enable.
    pub fn new(clocks: &ClockMap, delay: D, settle_us: u32) -> Self {
        Self {
            reference: clocks.fll_reference,
            output: clocks.fll_output,
            delay,
            settle_us,
            active: false,
        }
    }

    /// Returns `true` once an enable has completed and not been undone.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Settle wait applied after programming, in µs.
    pub fn settle_us(&self) -> u32 {
        self.settle_us
    }

    /// Program the FLL to `target` and wait for it to lock.
    ///
    /// # Errors
    /// - [`ClockError::AlreadyActive`] if the FLL is running; nothing is written.
    /// - [`ClockError::RejectedByHardware`] if either write fails; the FLL is
    ///   left inactive.
    pub async fn enable<R: RegisterInterface>(
        &mut self,
        codec: &mut CodecHandle<R>,
        target: FllTarget,
    ) -> Result<(), ClockError> {
        if self.active {
            error!("FLL enable while already active");
            return Err(ClockError::AlreadyActive);
        }

        if codec.write(self.reference, reference_value(target)).await.is_err() {
            debug!("FLL reference {} Hz rejected", target.reference_frequency_hz);
            self.active = false;
            return Err(ClockError::RejectedByHardware);
        }

        let output = RegisterValue::Rate(target.output_frequency_hz);
        if codec.write(self.output, output).await.is_err() {
            debug!("FLL output {} Hz rejected", target.output_frequency_hz);
            self.active = false;
            return Err(ClockError::RejectedByHardware);
        }

        debug!("FLL settle {} us", self.settle_us);
        self.delay.delay_us(self.settle_us).await;
        self.active = true;
        info!(
            "FLL enabled: {} Hz -> {} Hz",
            target.reference_frequency_hz, target.output_frequency_hz
        );
        Ok(())
    }

    /// Stop the FLL. A no-op when it is not running.
    ///
    /// # Errors
    /// [`ClockError::RejectedByHardware`] if the write fails. The FLL is
    /// considered stopped either way and the write is not retried.
    pub async fn disable<R: RegisterInterface>(
        &mut self,
        codec: &mut CodecHandle<R>,
    ) -> Result<(), ClockError> {
        if !self.active {
            return Ok(());
        }

        let result = codec
            .write(self.reference, reference_value(FllTarget::disabled()))
            .await;
        // Only cleared once the write has run, so a cancelled disable can be repeated.
        self.active = false;
        result.map_err(|_| {
            debug!("FLL disable rejected");
            ClockError::RejectedByHardware
        })?;
        info!("FLL disabled");
        Ok(())
    }
}

/// Reference-field value selecting `target`'s input.
fn reference_value(target: FllTarget) -> RegisterValue {
    RegisterValue::Clock {
        source: target.reference_source.into(),
        frequency_hz: target.reference_frequency_hz,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use embassy_futures::{block_on, poll_once};
    use platform::mocks::{MockDelay, MockRegisters, VirtualClock};
    use platform::{ClockSource, HardwareError, CS47L35_CLOCK_MAP};

    const TARGET: FllTarget = FllTarget::from_mclk(12_288_000, 98_304_000);

    type Rig = (
        CodecHandle<MockRegisters>,
        FllController<MockDelay>,
        MockRegisters,
        MockDelay,
    );

    fn rig(settle_us: u32) -> Rig {
        let clock = VirtualClock::new();
        let regs = MockRegisters::with_clock(clock.clone());
        let delay = MockDelay::new(clock);
        let codec = CodecHandle::new(regs.clone(), &CS47L35_CLOCK_MAP);
        let fll = FllController::new(&CS47L35_CLOCK_MAP, delay.clone(), settle_us);
        (codec, fll, regs, delay)
    }

    #[tokio::test]
    async fn enable_writes_reference_then_output() {
        let (mut codec, mut fll, regs, _) = rig(1_000);
        fll.enable(&mut codec, TARGET).await.unwrap();

        let journal = regs.journal();
        assert_eq!(journal.len(), 2);
        assert_eq!(journal[0].target, CS47L35_CLOCK_MAP.fll_reference);
        assert_eq!(
            journal[0].value,
            RegisterValue::Clock {
                source: ClockSource::ExternalMasterClock,
                frequency_hz: 12_288_000
            }
        );
        assert_eq!(journal[1].target, CS47L35_CLOCK_MAP.fll_output);
        assert_eq!(journal[1].value, RegisterValue::Rate(98_304_000));
        assert!(fll.is_active());
    }

    #[tokio::test]
    async fn enable_returns_only_after_settle_wait() {
        let (mut codec, mut fll, regs, delay) = rig(1_500);
        fll.enable(&mut codec, TARGET).await.unwrap();

        let last_write = regs.journal()[1].at_us;
        assert_eq!(delay.total_us(), 1_500);
        assert!(regs.clock().now_us() >= last_write + 1_000);
    }

    #[tokio::test]
    async fn enable_while_active_is_rejected_without_writes() {
        let (mut codec, mut fll, regs, _) = rig(1_000);
        fll.enable(&mut codec, TARGET).await.unwrap();
        regs.clear_journal();

        assert_eq!(fll.enable(&mut codec, TARGET).await, Err(ClockError::AlreadyActive));
        assert_eq!(regs.write_count(), 0);
        assert!(fll.is_active());
    }

    #[tokio::test]
    async fn rejected_output_leaves_fll_inactive_and_skips_settle() {
        let (mut codec, mut fll, regs, delay) = rig(1_000);
        regs.fail_field(CS47L35_CLOCK_MAP.fll_output, HardwareError::InvalidTransition);

        assert_eq!(
            fll.enable(&mut codec, TARGET).await,
            Err(ClockError::RejectedByHardware)
        );
        assert!(!fll.is_active());
        assert_eq!(delay.total_us(), 0);
    }

    #[tokio::test]
    async fn rejected_reference_never_writes_output() {
        let (mut codec, mut fll, regs, _) = rig(1_000);
        regs.fail_nth_write(0, HardwareError::Timeout);

        assert!(fll.enable(&mut codec, TARGET).await.is_err());
        assert!(regs.writes_to(CS47L35_CLOCK_MAP.fll_output).is_empty());
    }

    #[tokio::test]
    async fn disable_when_inactive_writes_nothing() {
        let (mut codec, mut fll, regs, _) = rig(1_000);
        fll.disable(&mut codec).await.unwrap();
        fll.disable(&mut codec).await.unwrap();
        assert_eq!(regs.write_count(), 0);
    }

    #[tokio::test]
    async fn disable_writes_disabled_reference_once() {
        let (mut codec, mut fll, regs, _) = rig(1_000);
        fll.enable(&mut codec, TARGET).await.unwrap();
        regs.clear_journal();

        fll.disable(&mut codec).await.unwrap();
        fll.disable(&mut codec).await.unwrap();

        let journal = regs.journal();
        assert_eq!(journal.len(), 1);
        assert_eq!(journal[0].target, CS47L35_CLOCK_MAP.fll_reference);
        assert_eq!(
            journal[0].value,
            RegisterValue::Clock {
                source: ClockSource::None,
                frequency_hz: 0
            }
        );
        assert!(!fll.is_active());
    }

    #[tokio::test]
    async fn failed_disable_still_clears_active_and_does_not_retry() {
        let (mut codec, mut fll, regs, _) = rig(1_000);
        fll.enable(&mut codec, TARGET).await.unwrap();
        regs.fail_field(CS47L35_CLOCK_MAP.fll_reference, HardwareError::Bus);
        regs.clear_journal();

        assert_eq!(fll.disable(&mut codec).await, Err(ClockError::RejectedByHardware));
        assert!(!fll.is_active());
        assert_eq!(regs.write_count(), 1);
    }

    #[test]
    fn cancelled_disable_leaves_fll_active_for_a_retry() {
        let (mut codec, mut fll, regs, _) = rig(1_000);
        block_on(fll.enable(&mut codec, TARGET)).unwrap();
        regs.clear_journal();

        // The mock yields before touching the register, so one poll parks
        // the disable mid-write and dropping it cancels the write.
        assert!(poll_once(fll.disable(&mut codec)).is_pending());
        assert!(fll.is_active());
        assert_eq!(regs.write_count(), 0);

        block_on(fll.disable(&mut codec)).unwrap();
        assert!(!fll.is_active());
        assert_eq!(regs.writes_to(CS47L35_CLOCK_MAP.fll_reference).len(), 1);
    }
}
