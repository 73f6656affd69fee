//! Host-link wire formats: the framed serial command protocol and the USB HID
//! haptic output report.
//!
//! This crate is `no_std` and allocation-free; it only uses `core`.
//! Everything here is a pure function over byte slices, so it is exercised
//! entirely by host tests.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod frame;
pub mod hid;

pub use frame::{calculate_checksum, decode, encode, validate, Command, FrameError, NACK_SENTINEL};
pub use hid::{parse_output_report, HapticReport, ReportKind, REPORT_DESCRIPTOR, REPORT_ID};
