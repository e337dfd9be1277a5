//! Property-based tests for the bias sequencer and FLL controller.
//! Verifies invariants hold for ALL transition sequences, not just the
//! scripted scenarios.

// Integration test file -- intentional test patterns permitted.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use machine::{BiasSequencer, CodecHandle, FllController};
use platform::mocks::{MockDelay, MockRegisters, VirtualClock};
use platform::{DeviceId, FllTarget, HardwareError, PowerBiasLevel, CS47L35_CLOCK_MAP};
use proptest::prelude::*;

const DAI: DeviceId = DeviceId(1);
const TARGET: FllTarget = FllTarget::from_mclk(12_288_000, 98_304_000);

/// One authority transition, with optional hardware faults armed.
#[derive(Debug, Clone, Copy)]
struct Step {
    device: DeviceId,
    level: PowerBiasLevel,
    reject_enable: bool,
    reject_disable: bool,
}

fn step() -> impl Strategy<Value = Step> {
    (
        prop_oneof![4 => Just(DAI), 1 => Just(DeviceId(2))],
        prop::sample::select(PowerBiasLevel::ALL.to_vec()),
        prop::bool::weighted(0.2),
        prop::bool::weighted(0.2),
    )
        .prop_map(|(device, level, reject_enable, reject_disable)| Step {
            device,
            level,
            reject_enable,
            reject_disable,
        })
}

fn rig() -> (BiasSequencer<NoopRawMutex, MockRegisters, MockDelay>, MockRegisters, MockDelay) {
    let clock = VirtualClock::new();
    let regs = MockRegisters::with_clock(clock.clone());
    let delay = MockDelay::new(clock);
    let codec = CodecHandle::new(regs.clone(), &CS47L35_CLOCK_MAP);
    let fll = FllController::new(&CS47L35_CLOCK_MAP, delay.clone(), 1_000);
    (BiasSequencer::new(DAI, TARGET, codec, fll), regs, delay)
}

proptest! {
    /// After every post hook, a committed Off/Standby level has the FLL stopped,
    /// and a running FLL always sits at Prepare or On.
    #[test]
    fn fll_only_runs_at_clocked_levels(steps in prop::collection::vec(step(), 1..40)) {
        let (seq, regs, _) = rig();
        block_on(async {
            for s in &steps {
                regs.clear_failures();
                if s.reject_enable {
                    regs.fail_field(CS47L35_CLOCK_MAP.fll_output, HardwareError::InvalidTransition);
                }
                if s.reject_disable {
                    regs.fail_field(CS47L35_CLOCK_MAP.fll_reference, HardwareError::Timeout);
                }

                seq.pre_bias_change(s.device, s.level).await;
                seq.post_bias_change(s.device, s.level).await;

                let state = seq.state().await;
                if !state.current_bias.is_clocked() {
                    prop_assert!(!state.fll_active, "FLL running at {} after {:?}", state.current_bias, s);
                }
                if state.fll_active {
                    prop_assert!(state.current_bias.is_clocked());
                }
            }
            Ok(())
        })?;
    }

    /// Every settled enable is followed by at most one disable write, and
    /// every enable that reported success waited the settle time.
    #[test]
    fn each_enable_settles_and_is_disabled_at_most_once(
        levels in prop::collection::vec(prop::sample::select(PowerBiasLevel::ALL.to_vec()), 1..40)
    ) {
        let (seq, regs, delay) = rig();
        let mut enables = 0u64;
        block_on(async {
            for &level in &levels {
                if seq.pre_bias_change(DAI, level).await == machine::BiasOutcome::FllEnabled {
                    enables += 1;
                }
                seq.post_bias_change(DAI, level).await;
            }
        });

        prop_assert_eq!(delay.total_us(), enables * 1_000);
        let reference_writes = u64::try_from(regs.writes_to(CS47L35_CLOCK_MAP.fll_reference).len()).unwrap();
        let disables = reference_writes - enables;
        prop_assert!(disables <= enables);
    }

    /// `disable(); disable();` writes the hardware exactly as often as one `disable()`.
    #[test]
    fn disable_is_idempotent(start_active in any::<bool>(), repeats in 1usize..8) {
        let regs = MockRegisters::new();
        let mut codec = CodecHandle::new(regs.clone(), &CS47L35_CLOCK_MAP);
        let mut fll = FllController::new(&CS47L35_CLOCK_MAP, MockDelay::new(VirtualClock::new()), 1_000);

        block_on(async {
            if start_active {
                fll.enable(&mut codec, TARGET).await.unwrap();
            }
            regs.clear_journal();
            for _ in 0..repeats {
                prop_assert!(fll.disable(&mut codec).await.is_ok());
            }
            Ok(())
        })?;

        prop_assert_eq!(regs.write_count(), usize::from(start_active));
        prop_assert!(!fll.is_active());
    }
}
