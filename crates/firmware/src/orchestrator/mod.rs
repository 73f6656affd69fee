//! Playback orchestration.
//!
//! Two independent paths end at the hardware:
//!
//! ```text
//! serial ─ intake ─ CommandQueue ─ run_serial_playback ─ SamplePlayer ─ AudioSink
//! USB HID ─ report channel ─ run_report_playback ─ play_effect ─ SharedActuator
//! ```

mod effect;
mod sample;

pub use effect::{handle_report, play_effect, run_report_playback};
pub use sample::{run_serial_playback, PlayError, PlaybackError, SamplePlayer};
