//! USB HID → DRV2605 integration tests
//!
//! Runs the real `Drv2605` driver against `RegisterFileBus`, a fake I²C
//! device with an observable register file, and checks what a haptic output
//! report leaves behind in the chip's registers.
//!
//! Run with: cargo test -p firmware --test hid_haptics

use std::time::Duration as StdDuration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use firmware::haptic::drv2605::registers::*;
use firmware::haptic::RegisterFileBus;
use firmware::{configure_actuator, handle_report, run_report_playback, Drv2605, SharedActuator};
use platform::config::DRV2605_I2C_ADDR;
use platform::{HapticDriver, HapticError, Mode};
use protocol::{parse_output_report, HapticReport, ReportKind};

type Actuator = SharedActuator<CriticalSectionRawMutex, Drv2605<RegisterFileBus>>;

async fn booted() -> Actuator {
    let bus = RegisterFileBus::new(DRV2605_I2C_ADDR);
    let Ok(mut driver) = Drv2605::bind(bus, DRV2605_I2C_ADDR).await else {
        panic!("bind failed on a healthy bus");
    };
    assert!(configure_actuator(&mut driver).await.is_clean());
    SharedActuator::bound(driver)
}

async fn registers(actuator: &Actuator) -> RegisterFileBus {
    actuator.unbind().await.unwrap().release()
}

#[tokio::test]
async fn boot_leaves_lra_internal_trigger_and_library_one() {
    let bus = registers(&booted().await).await;
    assert_eq!(bus.reg(REG_MODE), Mode::InternalTrigger.bits());
    assert_eq!(bus.reg(REG_LIBRARY), 1);
    assert_eq!(bus.reg(REG_FEEDBACK) & FEEDBACK_N_ERM_LRA, FEEDBACK_N_ERM_LRA);
    assert_eq!(bus.reg(REG_CONTROL3) & CONTROL3_ERM_OPEN_LOOP, CONTROL3_ERM_OPEN_LOOP);
    assert_eq!(bus.reg(REG_AUDIOMAX), AUDIOMAX_DEFAULT);
    assert_eq!(bus.reg(REG_GO), GO_START);
}

#[tokio::test]
async fn output_report_loads_effect_and_fires() {
    let actuator = booted().await;
    assert_eq!(handle_report(&actuator, ReportKind::Output, 0x10, &[0x07]).await, Some(Ok(())));

    let bus = registers(&actuator).await;
    assert_eq!(bus.reg(REG_WAVESEQ1), 0x07);
    assert_eq!(bus.reg(REG_WAVESEQ2), EFFECT_END);
    assert_eq!(bus.reg(REG_GO), GO_START);
}

#[tokio::test]
async fn foreign_reports_leave_the_sequencer_alone() {
    let actuator = booted().await;
    assert!(handle_report(&actuator, ReportKind::Output, 0x11, &[0x07]).await.is_none());
    assert!(handle_report(&actuator, ReportKind::Feature, 0x10, &[0x07]).await.is_none());

    let bus = registers(&actuator).await;
    assert_eq!(bus.reg(REG_WAVESEQ1), EFFECT_STRONG_CLICK);
}

#[tokio::test]
async fn queued_reports_flow_through_playback_task() {
    let actuator = booted().await;
    let reports: Channel<CriticalSectionRawMutex, HapticReport, 4> = Channel::new();
    for (report_id, effect) in [(0x10, 0x2F), (0x11, 0x01), (0x10, 0x0E)] {
        if let Some(report) = parse_output_report(ReportKind::Output, report_id, &[effect]) {
            reports.try_send(report).unwrap();
        }
    }

    let _ = tokio::time::timeout(StdDuration::from_millis(100), run_report_playback(&reports, &actuator)).await;

    assert!(reports.is_empty());
    // Last report wins.
    assert_eq!(registers(&actuator).await.reg(REG_WAVESEQ1), 0x0E);
}

#[tokio::test]
async fn topology_switch_round_trips() {
    let mut driver = Drv2605::new(RegisterFileBus::new(DRV2605_I2C_ADDR), DRV2605_I2C_ADDR);
    driver.use_lra().await.unwrap();
    driver.use_erm().await.unwrap();

    let bus = driver.release();
    assert_eq!(bus.reg(REG_FEEDBACK) & FEEDBACK_N_ERM_LRA, 0);
    assert_eq!(bus.reg(REG_CONTROL3) & CONTROL3_ERM_OPEN_LOOP, 0);
}

#[tokio::test]
async fn failed_topology_switch_leaves_both_bits_unchanged() {
    let mut bus = RegisterFileBus::new(DRV2605_I2C_ADDR);
    bus.fail_writes_of(Some(REG_CONTROL3));
    let mut driver = Drv2605::new(bus, DRV2605_I2C_ADDR);

    assert!(matches!(driver.use_lra().await, Err(HapticError::Bus(_))));

    let bus = driver.release();
    assert_eq!(bus.reg(REG_FEEDBACK) & FEEDBACK_N_ERM_LRA, 0);
    assert_eq!(bus.reg(REG_CONTROL3) & CONTROL3_ERM_OPEN_LOOP, 0);
}

#[tokio::test]
async fn bus_fault_surfaces_but_go_is_still_attempted() {
    let mut bus = RegisterFileBus::new(DRV2605_I2C_ADDR);
    bus.fail_writes_of(Some(REG_WAVESEQ1));
    let actuator: Actuator = SharedActuator::bound(Drv2605::new(bus, DRV2605_I2C_ADDR));

    let result = handle_report(&actuator, ReportKind::Output, 0x10, &[0x07]).await;
    assert!(matches!(result, Some(Err(HapticError::Bus(_)))));
    assert_eq!(registers(&actuator).await.reg(REG_GO), GO_START);
}

#[tokio::test]
async fn wrong_address_fails_bind_and_returns_the_bus() {
    let bus = RegisterFileBus::new(0x5B);
    let Err(failure) = Drv2605::bind(bus, DRV2605_I2C_ADDR).await else {
        panic!("bind succeeded against a missing device");
    };
    assert!(matches!(failure.error, HapticError::Bus(_)));
    assert_eq!(failure.i2c.reg(REG_MODE), 0);
}
