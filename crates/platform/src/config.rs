//! Application configuration and constants
//!
//! This module defines central configuration values used across the
//! application. There is no runtime configuration: every tunable is a
//! compile-time constant here, and build targets are selected with cargo
//! features.

use crate::haptic::Topology;

/// The application name
pub const APP_NAME: &str = "Haptic Bridge";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Actuator bus ────────────────────────────────────────────────────────────

/// 7-bit I²C address of the DRV2605.
pub const DRV2605_I2C_ADDR: u8 = 0x5A;

/// I²C bus clock.
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Upper bound on a single register transaction.
pub const BUS_TIMEOUT_MS: u64 = 100;

/// Effect library selected at boot (ERM library A).
pub const BOOT_LIBRARY: u8 = 1;

/// Actuator topology configured at boot.
pub const BOOT_TOPOLOGY: Topology = Topology::Lra;

// ── Serial link ─────────────────────────────────────────────────────────────

/// UART baud rate of the command link.
pub const SERIAL_BAUD: u32 = 115_200;

/// How long one intake poll waits for bytes.
pub const SERIAL_POLL_TIMEOUT_MS: u64 = 20;

/// Upper bound on an echo or NACK write.
pub const SERIAL_WRITE_TIMEOUT_MS: u64 = 20;

/// Intake receive buffer. One byte is kept in reserve, so a single poll
/// reads at most `SERIAL_BUF_SIZE - 1` bytes.
pub const SERIAL_BUF_SIZE: usize = 128;

// ── Dispatch ────────────────────────────────────────────────────────────────

/// Capacity of the serial command queue.
pub const COMMAND_QUEUE_DEPTH: usize = 10;

// ── Samples ─────────────────────────────────────────────────────────────────

/// Maximum number of samples the flash-resident store can hold.
pub const SAMPLE_SLOTS: usize = 16;

/// Bytes moved from storage to the audio sink per write.
pub const SAMPLE_CHUNK_BYTES: usize = 512;

/// Offset of the first chunk header in a RIFF/WAVE file.
pub const RIFF_HEADER_LEN: u64 = 12;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_is_whole_stereo_frames() {
        assert_eq!(SAMPLE_CHUNK_BYTES % 4, 0);
    }

    #[test]
    fn serial_buffer_holds_a_minimal_frame() {
        assert!(SERIAL_BUF_SIZE > 5);
    }
}
