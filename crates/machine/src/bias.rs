//! Bias sequencer
//!
//! Reacts to the power-management authority's bias transitions for one codec
//! DAI and keeps FLL1 running exactly while the codec is clocked.
//!
//! | Hook   | Level              | Action                                    |
//! |--------|--------------------|-------------------------------------------|
//! | `pre`  | `Prepare`          | enable FLL unless the committed level is `On` |
//! | `post` | `Standby`, `Off`   | disable FLL, commit level                 |
//! | `post` | `Prepare`, `On`    | commit level                              |
//! | `pre`  | any other          | nothing                                   |
//!
//! One async mutex serialises every hook. It is held across the whole
//! register sequence including the settle wait, so a concurrent disable can
//! never land between the reference and output writes of an enable.
//!
//! Hooks never fail. A clocking error degrades audio but must not stall the
//! power state machine, so it is logged and reported as
//! [`BiasOutcome::Degraded`].

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;
use platform::{DeviceId, FllTarget, PowerBiasLevel, RegisterInterface};

use crate::clock::{CodecHandle, FllController};
use crate::error::ClockError;

/// Snapshot of the sequencer's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequencerState {
    /// Last level committed by a post hook
    pub current_bias: PowerBiasLevel,
    /// FLL programmed and settled
    pub fll_active: bool,
}

/// What a hook did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BiasOutcome {
    /// Event belongs to another device
    Ignored,
    /// No FLL change was needed
    Unchanged,
    /// FLL programmed and settled
    FllEnabled,
    /// FLL stopped
    FllDisabled,
    /// FLL operation failed; the transition proceeds with degraded clocking
    Degraded(ClockError),
}

struct Inner<R, D> {
    current_bias: PowerBiasLevel,
    codec: CodecHandle<R>,
    fll: FllController<D>,
}

/// Bias-driven FLL sequencing for one codec DAI.
pub struct BiasSequencer<M: RawMutex, R, D> {
    device: DeviceId,
    target: FllTarget,
    inner: Mutex<M, Inner<R, D>>,
}

impl<M, R, D> BiasSequencer<M, R, D>
where
    M: RawMutex,
    R: RegisterInterface,
    D: DelayNs,
{
    /// Sequencer for `device`, programming `target` on every `Prepare`.
    ///
    /// Starts at `Off` with the FLL considered stopped.
    pub fn new(device: DeviceId, target: FllTarget, codec: CodecHandle<R>, fll: FllController<D>) -> Self {
        Self {
            device,
            target,
            inner: Mutex::new(Inner {
                current_bias: PowerBiasLevel::Off,
                codec,
                fll,
            }),
        }
    }

    /// Device whose transitions this sequencer follows.
    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// FLL configuration applied on `Prepare`.
    pub fn target(&self) -> FllTarget {
        self.target
    }

    /// Hook run before the authority commits `level` for `device`.
    pub async fn pre_bias_change(&self, device: DeviceId, level: PowerBiasLevel) -> BiasOutcome {
        if device != self.device {
            return BiasOutcome::Ignored;
        }
        if level != PowerBiasLevel::Prepare {
            return BiasOutcome::Unchanged;
        }

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        if inner.current_bias == PowerBiasLevel::On {
            return BiasOutcome::Unchanged;
        }
        match inner.fll.enable(&mut inner.codec, self.target).await {
            Ok(()) => BiasOutcome::FllEnabled,
            Err(e) => {
                warn!("{}: pre-{} degraded: {}", device, level, e);
                BiasOutcome::Degraded(e)
            }
        }
    }

    /// Hook run after the authority committed `level` for `device`.
    pub async fn post_bias_change(&self, device: DeviceId, level: PowerBiasLevel) -> BiasOutcome {
        if device != self.device {
            return BiasOutcome::Ignored;
        }

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let outcome = if level.is_clocked() {
            BiasOutcome::Unchanged
        } else {
            let was_active = inner.fll.is_active();
            match inner.fll.disable(&mut inner.codec).await {
                Ok(()) if was_active => BiasOutcome::FllDisabled,
                Ok(()) => BiasOutcome::Unchanged,
                Err(e) => {
                    warn!("{}: post-{} degraded: {}", device, level, e);
                    BiasOutcome::Degraded(e)
                }
            }
        };
        inner.current_bias = level;
        outcome
    }

    /// Current state.
    pub async fn state(&self) -> SequencerState {
        let guard = self.inner.lock().await;
        SequencerState {
            current_bias: guard.current_bias,
            fll_active: guard.fll.is_active(),
        }
    }
}
