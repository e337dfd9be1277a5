//! Hardware Abstraction Layer (HAL) for the Cirrus Logic Madera audio card
//!
//! This crate provides the types and trait seams shared by the machine driver
//! and the codec bus glue, so that clock sequencing can be developed and
//! tested without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Power-management authority (bias transitions)
//!         ↓
//! Machine driver (machine crate - FLL controller, bias sequencer)
//!         ↓
//! Platform HAL (this crate - RegisterInterface, clock/bias types)
//!         ↓
//! Codec bus (MaderaBus over embedded-hal-async SPI)
//! ```
//!
//! # Modules
//!
//! - [`bias`] - Power bias levels and device identity
//! - [`clock`] - Clock sources, FLL targets and the per-deployment clock map
//! - [`register`] - The [`RegisterInterface`] seam and hardware errors
//! - [`variant`] - Codec variant lookup table (register-width configuration)
//! - [`transport`] - SPI register-map transport and bootstrap
//!
//! # Features
//!
//! - `std`: Enable standard library support (error impls, [`mocks`])
//! - `defmt`: Enable defmt::Format derives
//! - `cs47l15`, `cs47l35`, `cs47l85`, `cs47l90`, `cs47l92`: codec families
//!   compiled into the variant table
//!
//! # Example
//!
//! ```no_run
//! use platform::{DomainId, FieldId, RegisterInterface, RegisterValue};
//!
//! async fn park<R: RegisterInterface>(regs: &mut R) {
//!     let _ = regs
//!         .write(DomainId(1), FieldId(1), RegisterValue::Rate(0))
//!         .await;
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register and part names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod bias;
pub mod clock;
pub mod register;
pub mod transport;
pub mod variant;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export the types every consumer needs
pub use bias::{DeviceId, PowerBiasLevel};
pub use clock::{
    ClockDomain, ClockMap, ClockSource, DomainId, FieldId, FllReference, FllTarget,
    RegisterField, CS47L35_CLOCK_MAP,
};
pub use register::{HardwareError, RegisterInterface, RegisterValue};
pub use transport::{bootstrap, bootstrap_named, BootstrapError, MaderaBus, TransportError};
pub use variant::{CodecVariant, RegmapConfig, VariantDescriptor, VARIANT_TABLE};
