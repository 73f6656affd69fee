//! USB path: HID output report → built-in waveform on the actuator.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use platform::{HapticDriver, HapticError};
use protocol::{parse_output_report, HapticReport, ReportKind};

use crate::haptic::drv2605::registers::EFFECT_END;
use crate::haptic::SharedActuator;

const STEPS: [&str; 4] = ["stop", "set_waveform(0)", "set_waveform(1)", "go"];

/// Play built-in waveform `effect`: stop, program it into slot 0, terminate
/// the sequence at slot 1, go.
///
/// All four steps run under one lock and every step is attempted even if an
/// earlier one failed. Each failure is logged; the first one is returned.
pub async fn play_effect<M: RawMutex, D: HapticDriver>(
    actuator: &SharedActuator<M, D>,
    effect: u8,
) -> Result<(), HapticError<D::BusError>> {
    let mut driver = actuator.lock().await;
    let results = [
        driver.stop().await,
        driver.set_waveform(0, effect).await,
        driver.set_waveform(1, EFFECT_END).await,
        driver.go().await,
    ];
    drop(driver);

    let mut first = Ok(());
    for (step, result) in STEPS.iter().zip(results) {
        if let Err(e) = result {
            error!("effect {}: {} failed: {}", effect, *step, e.as_str());
            if first.is_ok() {
                first = Err(e);
            }
        }
    }
    first
}

/// Act on a SET_REPORT / interrupt OUT report.
///
/// Returns `None` if the report is not a haptic output report (wrong type,
/// wrong id or empty) and was ignored.
pub async fn handle_report<M: RawMutex, D: HapticDriver>(
    actuator: &SharedActuator<M, D>,
    kind: ReportKind,
    report_id: u8,
    payload: &[u8],
) -> Option<Result<(), HapticError<D::BusError>>> {
    let Some(report) = parse_output_report(kind, report_id, payload) else {
        debug!("ignored HID report id {} ({} bytes)", report_id, payload.len());
        return None;
    };
    info!("HID effect {}", report.effect);
    Some(play_effect(actuator, report.effect).await)
}

/// Report playback loop: play every report forwarded by the USB stack.
pub async fn run_report_playback<RM: RawMutex, const N: usize, M: RawMutex, D: HapticDriver>(
    reports: &Channel<RM, HapticReport, N>,
    actuator: &SharedActuator<M, D>,
) -> ! {
    info!("HID report playback running");
    loop {
        let report = reports.receive().await;
        info!("HID effect {}", report.effect);
        // Failures are logged step by step inside play_effect.
        let _ = play_effect(actuator, report.effect).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptic::mock::{ActuatorCall, MockActuator, MockBusError};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    const PLAY_7: [ActuatorCall; 4] = [
        ActuatorCall::Stop,
        ActuatorCall::SetWaveform { slot: 0, effect: 7 },
        ActuatorCall::SetWaveform { slot: 1, effect: 0 },
        ActuatorCall::Go,
    ];

    #[tokio::test]
    async fn effect_runs_four_steps_in_order() {
        let actuator = SharedActuator::<NoopRawMutex, _>::bound(MockActuator::new());
        play_effect(&actuator, 7).await.unwrap();
        let driver = actuator.unbind().await.unwrap();
        assert_eq!(driver.calls(), &PLAY_7);
        assert!(driver.playing);
    }

    #[tokio::test]
    async fn failed_step_does_not_skip_the_rest() {
        let actuator = SharedActuator::<NoopRawMutex, _>::bound(MockActuator::new().fail_on_call(0));
        assert_eq!(play_effect(&actuator, 7).await, Err(HapticError::Bus(MockBusError)));
        let driver = actuator.unbind().await.unwrap();
        assert_eq!(driver.calls(), &PLAY_7);
    }

    #[tokio::test]
    async fn unbound_actuator_reports_invalid_handle() {
        let actuator: SharedActuator<NoopRawMutex, MockActuator> = SharedActuator::new();
        assert_eq!(play_effect(&actuator, 1).await, Err(HapticError::InvalidHandle));
    }

    #[tokio::test]
    async fn only_haptic_output_reports_are_played() {
        let actuator = SharedActuator::<NoopRawMutex, _>::bound(MockActuator::new());
        assert!(handle_report(&actuator, ReportKind::Feature, 0x10, &[7]).await.is_none());
        assert!(handle_report(&actuator, ReportKind::Output, 0x11, &[7]).await.is_none());
        assert!(handle_report(&actuator, ReportKind::Output, 0x10, &[]).await.is_none());
        assert_eq!(handle_report(&actuator, ReportKind::Output, 0x10, &[7]).await, Some(Ok(())));
        let driver = actuator.unbind().await.unwrap();
        assert_eq!(driver.calls(), &PLAY_7);
    }
}
