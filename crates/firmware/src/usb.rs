//! USB HID haptic interface (embassy-usb).
//!
//! # Architecture
//!
//! The device exposes one HID interface with the report descriptor from
//! [`protocol::REPORT_DESCRIPTOR`]. Output reports arrive two ways:
//!
//! - SET_REPORT on the control pipe, handed to the [`ReportForwarder`]
//!   installed in the HID config;
//! - the interrupt OUT endpoint, read by [`HidReader::run`] with report IDs
//!   enabled, handed to a second [`ReportForwarder`].
//!
//! Both callbacks are synchronous, so neither touches the I²C bus. They
//! filter the report and forward it over a [`ReportChannel`] to the report
//! playback task, which drives the actuator.
//!
//! # Overflow handling
//!
//! A report that arrives while [`REPORT_CHANNEL_DEPTH`] reports are already
//! waiting is dropped and the request is still acknowledged.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::hid::{self, HidReader, HidReaderWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::driver::Driver;
use embassy_usb::{Builder, UsbDevice};
use protocol::{parse_output_report, HapticReport, ReportKind, REPORT_DESCRIPTOR};
use static_cell::StaticCell;

/// Depth of the report channel.
pub const REPORT_CHANNEL_DEPTH: usize = 4;

/// Interrupt endpoint packet size.
pub const HID_PACKET_SIZE: u16 = 16;

/// Interrupt endpoint polling interval.
pub const HID_POLL_MS: u8 = 10;

/// Reports on their way from the USB callbacks to report playback.
pub type ReportChannel = Channel<CriticalSectionRawMutex, HapticReport, REPORT_CHANNEL_DEPTH>;

/// Filters haptic output reports and forwards them to a [`ReportChannel`].
#[derive(Clone, Copy)]
pub struct ReportForwarder {
    reports: &'static ReportChannel,
}

impl ReportForwarder {
    /// Forwarder feeding `reports`.
    pub fn new(reports: &'static ReportChannel) -> Self {
        Self { reports }
    }
}

impl RequestHandler for ReportForwarder {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        let (kind, report_id) = match id {
            ReportId::In(id) => (ReportKind::Input, id),
            ReportId::Out(id) => (ReportKind::Output, id),
            ReportId::Feature(id) => (ReportKind::Feature, id),
        };
        match parse_output_report(kind, report_id, data) {
            Some(report) => {
                if self.reports.try_send(report).is_err() {
                    warn!("HID report dropped: effect {}", report.effect);
                }
            }
            None => debug!("ignored HID report id {}", report_id),
        }
        OutResponse::Accepted
    }
}

/// Bring-up strings and ids.
pub fn usb_config() -> embassy_usb::Config<'static> {
    let mut config = embassy_usb::Config::new(0xc0de, 0xcafe);
    config.manufacturer = Some("Haptic Bridge");
    config.product = Some("Haptic Bridge HID");
    config.serial_number = Some("000001");
    config.max_power = 100;
    config.max_packet_size_0 = 64;
    config
}

/// Build the USB device and the HID reader.
///
/// Must be called once; the descriptor buffers live in `StaticCell`s.
pub fn build<D: Driver<'static>>(
    driver: D,
    reports: &'static ReportChannel,
) -> (UsbDevice<'static, D>, HidReader<'static, D, 16>) {
    static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    static HID_STATE: StaticCell<State<'static>> = StaticCell::new();
    static CONTROL_HANDLER: StaticCell<ReportForwarder> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        usb_config(),
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        MSOS_DESCRIPTOR.init([0; 256]),
        CONTROL_BUF.init([0; 64]),
    );

    let hid_config = hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(CONTROL_HANDLER.init(ReportForwarder::new(reports))),
        poll_ms: HID_POLL_MS,
        max_packet_size: HID_PACKET_SIZE,
    };
    let hid = HidReaderWriter::<_, 16, 16>::new(&mut builder, HID_STATE.init(State::new()), hid_config);
    let (reader, _writer) = hid.split();

    (builder.build(), reader)
}
