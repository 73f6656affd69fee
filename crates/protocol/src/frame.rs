//! Serial command framing.
//!
//! ```text
//! +-------+-----+----------+----------+------+
//! | START | CMD | AUDIO_ID | CHECKSUM | STOP |
//! +-------+-----+----------+----------+------+
//! | 0xAA  | u8  | u8       | u8       | 0x55 |
//! +-------+-----+----------+----------+------+
//! ```
//!
//! The checksum is the low byte of the sum of every byte between START and
//! CHECKSUM. Frames longer than five bytes are accepted when the first byte,
//! the last byte and the checksum (second to last) all validate; CMD and
//! AUDIO_ID are always bytes 1 and 2.

#[cfg(test)]
#[allow(clippy::expect_used)] // Tests use expect() for readable assertions
mod tests {
    use super::{calculate_checksum, decode, encode, validate, Command, FrameError};

    // ---- Checksum tests -------------------------------------------------------

    #[test]
    fn test_checksum_wraps_modulo_256() {
        assert_eq!(calculate_checksum(&[0xFF, 0xFF]), 0xFE);
    }

    #[test]
    fn test_checksum_of_empty_is_zero() {
        assert_eq!(calculate_checksum(&[]), 0);
    }

    // ---- Decode tests ---------------------------------------------------------

    #[test]
    fn test_decode_minimal_frame() {
        // 0x01 + 0x02 = 0x03
        let cmd = decode(&[0xAA, 0x01, 0x02, 0x03, 0x55]).expect("valid frame");
        assert_eq!(cmd, Command { cmd: 0x01, audio_id: 0x02 });
    }

    #[test]
    fn test_decode_long_frame_sums_every_inner_byte() {
        // 0x05 + 0x07 + 0x10 + 0x20 = 0x3C
        let cmd = decode(&[0xAA, 0x05, 0x07, 0x10, 0x20, 0x3C, 0x55]).expect("valid frame");
        assert_eq!(cmd, Command { cmd: 0x05, audio_id: 0x07 });
    }

    #[test]
    fn test_bad_checksum_is_rejected() {
        let raw = [0xAA, 0x01, 0x02, 0x04, 0x55];
        assert_eq!(decode(&raw), None);
        assert_eq!(
            validate(&raw),
            Err(FrameError::ChecksumMismatch { expected: 0x03, found: 0x04 })
        );
    }

    #[test]
    fn test_short_frame_is_rejected() {
        assert_eq!(validate(&[0xAA, 0x00, 0x00, 0x55]), Err(FrameError::TooShort { len: 4 }));
        assert_eq!(validate(&[]), Err(FrameError::TooShort { len: 0 }));
    }

    #[test]
    fn test_bad_delimiters_are_rejected() {
        assert_eq!(validate(&[0xAB, 0x01, 0x02, 0x03, 0x55]), Err(FrameError::BadStart(0xAB)));
        assert_eq!(validate(&[0xAA, 0x01, 0x02, 0x03, 0x56]), Err(FrameError::BadStop(0x56)));
    }

    // ---- Encode tests ---------------------------------------------------------

    #[test]
    fn test_encode_layout() {
        let raw = encode(Command { cmd: 0x01, audio_id: 0xFF });
        assert_eq!(raw, [0xAA, 0x01, 0xFF, 0x00, 0x55]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public types
// ─────────────────────────────────────────────────────────────────────────────

/// First byte of every frame.
pub const START_BYTE: u8 = 0xAA;

/// Last byte of every frame.
pub const STOP_BYTE: u8 = 0x55;

/// Shortest valid frame: START, CMD, AUDIO_ID, CHECKSUM, STOP.
pub const MIN_FRAME_LEN: usize = 5;

/// Written back to the host in place of the echo when a frame is rejected.
pub const NACK_SENTINEL: [u8; 5] = [0xFF; 5];

/// A validated playback command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Command byte. Carried through for logging; every command plays.
    pub cmd: u8,
    /// Numeric id of the sample to play.
    pub audio_id: u8,
}

/// Why a frame was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Fewer than [`MIN_FRAME_LEN`] bytes.
    TooShort {
        /// Length of the rejected buffer.
        len: usize,
    },
    /// First byte is not [`START_BYTE`].
    BadStart(u8),
    /// Last byte is not [`STOP_BYTE`].
    BadStop(u8),
    /// Checksum byte does not match the payload.
    ChecksumMismatch {
        /// Checksum computed over the payload.
        expected: u8,
        /// Checksum carried by the frame.
        found: u8,
    },
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooShort { len } => write!(f, "frame too short ({len} bytes)"),
            Self::BadStart(b) => write!(f, "bad start byte 0x{b:02X}"),
            Self::BadStop(b) => write!(f, "bad stop byte 0x{b:02X}"),
            Self::ChecksumMismatch { expected, found } => {
                write!(f, "checksum mismatch: expected 0x{expected:02X}, found 0x{found:02X}")
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Codec
// ─────────────────────────────────────────────────────────────────────────────

/// Low byte of the arithmetic sum of `bytes`.
#[must_use]
pub fn calculate_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Validate `buf` as a frame, reporting why it was rejected.
///
/// # Errors
///
/// Returns the first violated rule, checked in order: length, start byte,
/// stop byte, checksum.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Safety: len >= MIN_FRAME_LEN checked first
pub fn validate(buf: &[u8]) -> Result<Command, FrameError> {
    let len = buf.len();
    if len < MIN_FRAME_LEN {
        return Err(FrameError::TooShort { len });
    }
    if buf[0] != START_BYTE {
        return Err(FrameError::BadStart(buf[0]));
    }
    let stop = buf[len - 1];
    if stop != STOP_BYTE {
        return Err(FrameError::BadStop(stop));
    }
    let found = buf[len - 2];
    let expected = calculate_checksum(&buf[1..len - 2]);
    if expected != found {
        return Err(FrameError::ChecksumMismatch { expected, found });
    }
    Ok(Command { cmd: buf[1], audio_id: buf[2] })
}

/// Decode `buf` into a [`Command`], or `None` if it is not a valid frame.
#[must_use]
pub fn decode(buf: &[u8]) -> Option<Command> {
    validate(buf).ok()
}

/// Encode `command` as a minimal five-byte frame.
#[must_use]
pub fn encode(command: Command) -> [u8; MIN_FRAME_LEN] {
    let checksum = calculate_checksum(&[command.cmd, command.audio_id]);
    [START_BYTE, command.cmd, command.audio_id, checksum, STOP_BYTE]
}
