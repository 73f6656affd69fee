//! USB HID haptic output report.
//!
//! The device enumerates as a Simple Haptic Controller (usage page 0x0E,
//! usage 0x01) with a single one-byte Output report, ID 0x10. The byte is the
//! id of a built-in waveform to play.
//!
//! Reports reach the firmware two ways: as an interrupt OUT transfer or as a
//! SET_REPORT control request. In both cases the USB stack splits off the
//! report type and ID, so [`parse_output_report`] sees the payload only.


// ─────────────────────────────────────────────────────────────────────────────
// Descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Report ID of the haptic output report.
pub const REPORT_ID: u8 = 0x10;

/// HID report descriptor.
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x0E, // Usage Page (Haptics)
    0x09, 0x01, // Usage (Simple Haptic Controller)
    0xA1, 0x01, // Collection (Application)
    0x85, REPORT_ID, //   Report ID (0x10)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x09, 0x01, //   Usage (0x01): one actuator
    0x19, 0x01, //   Usage Minimum (1)
    0x29, 0x01, //   Usage Maximum (1)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x01, //   Report Count (1)
    0x91, 0x02, //   Output (Data,Var,Abs)
    0xC0, // End Collection
];

// ─────────────────────────────────────────────────────────────────────────────
// Reports
// ─────────────────────────────────────────────────────────────────────────────

/// HID report type, as carried by a SET_REPORT request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportKind {
    /// Input report (device → host).
    Input,
    /// Output report (host → device).
    Output,
    /// Feature report.
    Feature,
}

/// A haptic output report: play built-in waveform `effect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HapticReport {
    /// Built-in waveform id.
    pub effect: u8,
}

/// Accept a report only if it is an Output report with ID [`REPORT_ID`] and
/// at least one payload byte. Anything else is ignored.
#[must_use]
pub fn parse_output_report(kind: ReportKind, report_id: u8, payload: &[u8]) -> Option<HapticReport> {
    if kind != ReportKind::Output || report_id != REPORT_ID {
        return None;
    }
    payload.first().map(|&effect| HapticReport { effect })
}
