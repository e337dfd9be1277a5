//! Machine driver for the Tegra + CS47L35 sound card
//!
//! Keeps the codec's FLL in step with the audio subsystem's power bias
//! levels, and registers the card with its clocks bound.
//!
//! # Architecture
//!
//! ```text
//! Power-management authority
//!         │ pre/post bias hooks
//!         ↓
//! BiasSequencer (bias)  ── one async mutex per card
//!         │
//!         ↓
//! FllController (clock::fll) ── settle wait via DelayNs
//!         │
//!         ↓
//! CodecHandle ── platform::RegisterInterface
//! ```
//!
//! Card registration ([`card`]) validates the [`CardConfig`], runs the
//! late-bind step ([`clock::late_bind`]) and only then builds the sequencer.
//!
//! # Features
//!
//! - `hardware`: embassy-time delay and defmt logging
//! - `defmt`: defmt logging and `defmt::Format` derives
//! - `tracing`: tracing logging (desktop)
//! - `std`: `std::error::Error` impls
//!
//! # Example
//!
//! ```no_run
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//! use machine::card::{probe, BoardNode, Phandle};
//! use machine::{CardConfig, CodecHandle};
//! use platform::{DeviceId, PowerBiasLevel, RegisterInterface, CS47L35_CLOCK_MAP};
//!
//! async fn bring_up<R, D>(regs: R, delay: D) -> Result<(), machine::CardError>
//! where
//!     R: RegisterInterface,
//!     D: embedded_hal_async::delay::DelayNs,
//! {
//!     let node = BoardNode {
//!         compatible: "nvidia,tegra-audio-t186ref-mobile-rt565x",
//!         i2s_controller: Some(Phandle(1)),
//!     };
//!     let codec = CodecHandle::new(regs, &CS47L35_CLOCK_MAP);
//!     let card = probe(Some(&node))?
//!         .register::<NoopRawMutex, _, _>(DeviceId(0), codec, delay, &CardConfig::default())
//!         .await?;
//!
//!     let seq = card.sequencer();
//!     seq.pre_bias_change(DeviceId(0), PowerBiasLevel::Prepare).await;
//!     seq.post_bias_change(DeviceId(0), PowerBiasLevel::Prepare).await;
//!     Ok(())
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

#[macro_use]
mod fmt;

pub mod bias;
pub mod card;
pub mod clock;
pub mod config;
pub mod error;

pub use bias::{BiasOutcome, BiasSequencer, SequencerState};
pub use card::{probe, BoardNode, BoundCard, RegisteredCard, TEGRA_CIRRUS_CARD};
pub use clock::{bind_system_clock, CodecHandle, FllController};
pub use config::{CardConfig, ConfigError};
pub use error::{CardError, ClockError};

/// Sequencer type for the hardware target: interrupt-safe mutex, embassy-time delay.
#[cfg(feature = "hardware")]
pub type HardwareSequencer<R> = BiasSequencer<
    embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex,
    R,
    embassy_time::Delay,
>;
