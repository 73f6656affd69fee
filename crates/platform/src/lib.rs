//! Hardware Abstraction Layer (HAL) for the haptic bridge
//!
//! This crate provides trait-based abstractions for every collaborator of the
//! command-to-actuation pipeline, enabling development and testing without
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Wire formats (protocol crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Abstractions
//!
//! - [`HapticDriver`] - Waveform-sequencer haptic driver IC
//! - [`SerialPort`] - Deadline-bounded serial command link
//! - [`AudioSink`] - Fixed-function PCM output
//! - [`Storage`] - Sample store (open-by-numeric-id)
//!
//! # Features
//!
//! - `std`: Enable standard library support (desktop storage, mocks)
//! - `hardware`: Physical hardware implementations
//! - `defmt`: Enable defmt logging
//!
//! # Example
//!
//! ```no_run
//! use platform::HapticDriver;
//!
//! async fn click<H: HapticDriver>(actuator: &mut H) {
//!     actuator.set_waveform(0, 1).await.unwrap();
//!     actuator.set_waveform(1, 0).await.unwrap();
//!     actuator.go().await.unwrap();
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
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio;
pub mod config;
pub mod haptic;
pub mod mocks;
pub mod serial;
pub mod storage;
pub mod storage_static;

#[cfg(any(test, feature = "std"))]
pub mod storage_local;

// Re-export main high-level traits
pub use audio::{AudioConfig, AudioSink};
pub use haptic::{HapticDriver, HapticError, Library, Mode, OutOfRangeError, Topology, WaveformSlot};
pub use serial::{SerialPort, TimeoutSerial};
pub use storage::{sample_path, File, Storage};
pub use storage_static::{StaticStorage, StaticStorageError};
