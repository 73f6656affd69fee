//! Haptic Bridge Firmware
//!
//! Drives a DRV2605 haptic driver IC and an I²S amplifier from two host
//! channels: a framed serial command link and a USB HID output report.
//!
//! # Architecture
//!
//! ```text
//! serial bytes ─ intake ─ CommandQueue ─ serial playback ─ sample store → AudioSink
//! USB HID report ─────────────────────── report playback ─ SharedActuator → DRV2605
//! ```
//!
//! Wire formats live in the `protocol` crate and hardware traits in
//! `platform`; this crate holds the driver, the tasks and the composition
//! root (`main.rs`).
//!
//! # Features
//!
//! - `hardware` - Build for STM32H7 target (embassy, defmt, USB, SAI)
//! - `tracing` - Log through `tracing` on the host
//! - `std` - Enable standard library support in `platform`
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```
//!
//! ## Host Tests
//!
//! ```bash
//! cargo test -p firmware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

#[macro_use]
mod fmt;

pub mod boot;
pub mod dispatch;
pub mod haptic;
pub mod intake;
pub mod orchestrator;
pub mod wav;

#[cfg(feature = "hardware")]
pub mod sai_sink;
#[cfg(feature = "hardware")]
pub mod usb;

// Re-export key types
pub use boot::{configure_actuator, BootReport, BootStep};
pub use dispatch::CommandQueue;
pub use haptic::{Drv2605, InitFailure, MockActuator, RegisterBus, SharedActuator};
pub use intake::{IntakeOutcome, SerialIntake};
pub use orchestrator::{
    handle_report, play_effect, run_report_playback, run_serial_playback, PlaybackError, SamplePlayer,
};
pub use wav::{find_data_chunk, ChunkError, DataChunk};
