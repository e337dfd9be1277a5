//! Late-bind initializer
//!
//! Runs once at card registration, before any bias transition can enable
//! the FLL:
//!
//! 1. DAI clock <- SYSCLK, rate left to hw_params
//! 2. SYSCLK    <- FLL output at `sysclk_hz`
//!
//! Both steps always run; a failure in either aborts registration.

use platform::{ClockDomain, ClockSource, RegisterInterface, RegisterValue};

use super::CodecHandle;
use crate::error::ClockError;

/// Attach the DAI clock to SYSCLK and SYSCLK to the FLL.
///
/// # Errors
/// [`ClockError::RejectedByHardware`] if either write fails. The second
/// write is not attempted after a failed first.
pub async fn bind_system_clock<R: RegisterInterface>(
    codec: &mut CodecHandle<R>,
    sysclk_hz: u32,
) -> Result<(), ClockError> {
    let dai = codec.clocks.field(ClockDomain::DaiClock);
    let dai_clock = RegisterValue::Clock {
        source: ClockSource::SystemClock,
        frequency_hz: 0,
    };
    codec.write(dai, dai_clock).await.map_err(|_| {
        error!("Failed to attach DAI clock to SYSCLK");
        ClockError::RejectedByHardware
    })?;

    let sys = codec.clocks.field(ClockDomain::SystemClock);
    let sysclk = RegisterValue::Clock {
        source: ClockSource::Fll,
        frequency_hz: sysclk_hz,
    };
    codec.write(sys, sysclk).await.map_err(|_| {
        error!("Failed to set SYSCLK source to FLL at {} Hz", sysclk_hz);
        ClockError::RejectedByHardware
    })?;

    debug!("SYSCLK bound to FLL at {} Hz", sysclk_hz);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use platform::mocks::MockRegisters;
    use platform::{HardwareError, CS47L35_CLOCK_MAP};

    #[tokio::test]
    async fn binds_dai_then_sysclk() {
        let regs = MockRegisters::new();
        let mut codec = CodecHandle::new(regs.clone(), &CS47L35_CLOCK_MAP);
        bind_system_clock(&mut codec, 98_304_000).await.unwrap();

        let journal = regs.journal();
        assert_eq!(journal.len(), 2);
        assert_eq!(journal[0].target, CS47L35_CLOCK_MAP.dai_clock);
        assert_eq!(
            journal[0].value,
            RegisterValue::Clock {
                source: ClockSource::SystemClock,
                frequency_hz: 0
            }
        );
        assert_eq!(journal[1].target, CS47L35_CLOCK_MAP.system_clock);
        assert_eq!(
            journal[1].value,
            RegisterValue::Clock {
                source: ClockSource::Fll,
                frequency_hz: 98_304_000
            }
        );
    }

    #[tokio::test]
    async fn failed_dai_bind_skips_sysclk() {
        let regs = MockRegisters::new();
        regs.fail_field(CS47L35_CLOCK_MAP.dai_clock, HardwareError::InvalidRegister);
        let mut codec = CodecHandle::new(regs.clone(), &CS47L35_CLOCK_MAP);

        assert_eq!(
            bind_system_clock(&mut codec, 98_304_000).await,
            Err(ClockError::RejectedByHardware)
        );
        assert!(regs.writes_to(CS47L35_CLOCK_MAP.system_clock).is_empty());
    }

    #[tokio::test]
    async fn failed_sysclk_bind_is_reported() {
        let regs = MockRegisters::new();
        regs.fail_field(CS47L35_CLOCK_MAP.system_clock, HardwareError::InvalidTransition);
        let mut codec = CodecHandle::new(regs.clone(), &CS47L35_CLOCK_MAP);

        assert_eq!(
            bind_system_clock(&mut codec, 98_304_000).await,
            Err(ClockError::RejectedByHardware)
        );
        assert_eq!(regs.write_count(), 2);
    }
}
