//! DRV2605 register map
//!
//! Source: TI DRV2605 datasheet (SLOS825), section 8.6.
//!
//! # Key I²C constraints
//!
//! ## Single-register transactions
//! Every access is a single-register transaction: a write sends
//! `[register, value]`, a read is a `write_read` with one address byte out and
//! one data byte back. Nothing here relies on address auto-increment.
//!
//! ## Standby on power-up
//! The device powers up in standby (MODE bit 6 set). Writing MODE ← 0 is the
//! first step of initialisation; no other register write takes effect on the
//! actuator until standby is cleared.
//!
//! ## Topology bits move together
//! FEEDBACK bit 7 (N_ERM_LRA) selects the actuator type and CONTROL3 bit 5
//! (ERM_OPEN_LOOP) selects open-loop drive. The driver keeps the two bits
//! equal: both set for LRA, both cleared for ERM.

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Status: device id (bits 7:5), diagnostic result, overtemp, overcurrent.
pub const REG_STATUS: u8 = 0x00;

/// Mode: device reset (bit 7), standby (bit 6), operating mode (bits 2:0).
pub const REG_MODE: u8 = 0x01;

/// Real-time playback input.
pub const REG_RTPIN: u8 = 0x02;

/// Waveform library selection (bits 2:0).
pub const REG_LIBRARY: u8 = 0x03;

/// Waveform sequencer, slot 1. Slots 2–8 follow at consecutive addresses.
pub const REG_WAVESEQ1: u8 = 0x04;
/// Waveform sequencer, slot 2.
pub const REG_WAVESEQ2: u8 = 0x05;
/// Waveform sequencer, slot 3.
pub const REG_WAVESEQ3: u8 = 0x06;
/// Waveform sequencer, slot 4.
pub const REG_WAVESEQ4: u8 = 0x07;
/// Waveform sequencer, slot 5.
pub const REG_WAVESEQ5: u8 = 0x08;
/// Waveform sequencer, slot 6.
pub const REG_WAVESEQ6: u8 = 0x09;
/// Waveform sequencer, slot 7.
pub const REG_WAVESEQ7: u8 = 0x0A;
/// Waveform sequencer, slot 8.
pub const REG_WAVESEQ8: u8 = 0x0B;

/// GO: write 1 to fire the sequence, 0 to stop it.
pub const REG_GO: u8 = 0x0C;

/// Overdrive time offset.
pub const REG_OVERDRIVE: u8 = 0x0D;
/// Sustain time offset, positive.
pub const REG_SUSTAINPOS: u8 = 0x0E;
/// Sustain time offset, negative.
pub const REG_SUSTAINNEG: u8 = 0x0F;
/// Brake time offset.
pub const REG_BRAKE: u8 = 0x10;

/// Audio-to-vibe control.
pub const REG_AUDIOCTRL: u8 = 0x11;
/// Audio-to-vibe minimum input level.
pub const REG_AUDIOLVL: u8 = 0x12;
/// Audio-to-vibe maximum input level.
pub const REG_AUDIOMAX: u8 = 0x13;
/// Audio-to-vibe minimum output drive.
pub const REG_AUDIOOUTMIN: u8 = 0x14;
/// Audio-to-vibe maximum output drive.
pub const REG_AUDIOOUTMAX: u8 = 0x15;

/// Rated voltage.
pub const REG_RATEDV: u8 = 0x16;
/// Overdrive clamp voltage.
pub const REG_CLAMPV: u8 = 0x17;
/// Auto-calibration compensation result.
pub const REG_AUTOCALCOMP: u8 = 0x18;
/// Auto-calibration back-EMF result.
pub const REG_AUTOCALEMP: u8 = 0x19;

/// Feedback control: N_ERM_LRA (bit 7), brake factor, loop gain, back-EMF gain.
pub const REG_FEEDBACK: u8 = 0x1A;

/// Control 1: startup boost, AC coupling, drive time.
pub const REG_CONTROL1: u8 = 0x1B;
/// Control 2: bidirectional input, brake stabilizer, sample time, blanking.
pub const REG_CONTROL2: u8 = 0x1C;
/// Control 3: noise gate, ERM_OPEN_LOOP (bit 5), supply compensation, LRA drive.
pub const REG_CONTROL3: u8 = 0x1D;
/// Control 4: auto-calibration time, OTP status.
pub const REG_CONTROL4: u8 = 0x1E;

/// Supply voltage monitor.
pub const REG_VBAT: u8 = 0x21;
/// LRA resonance period.
pub const REG_LRARESON: u8 = 0x22;

// ---------------------------------------------------------------------------
// Bit fields and values
// ---------------------------------------------------------------------------

/// MODE: device reset (self-clearing).
pub const MODE_DEV_RESET: u8 = 0x80;
/// MODE: standby.
pub const MODE_STANDBY: u8 = 0x40;

/// FEEDBACK bit 7: 1 = LRA, 0 = ERM.
pub const FEEDBACK_N_ERM_LRA: u8 = 0x80;

/// CONTROL3 bit 5: open-loop drive.
pub const CONTROL3_ERM_OPEN_LOOP: u8 = 0x20;

/// Audio-to-vibe maximum input level written at init.
pub const AUDIOMAX_DEFAULT: u8 = 0x64;

/// GO value that fires the sequence.
pub const GO_START: u8 = 0x01;
/// GO value that stops the sequence.
pub const GO_STOP: u8 = 0x00;

/// Effect id 1 in every ROM library: strong click, 100 %.
pub const EFFECT_STRONG_CLICK: u8 = 0x01;
/// Effect id 0 terminates the sequence.
pub const EFFECT_END: u8 = 0x00;

/// Address of sequencer slot `slot` (0-based).
pub fn waveseq(slot: platform::WaveformSlot) -> u8 {
    // Slot index is at most 7, so this stays within WAVESEQ1..=WAVESEQ8.
    REG_WAVESEQ1.wrapping_add(slot.index())
}
