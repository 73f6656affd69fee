//! Boot sequence for the haptic bridge.
//!
//! Initialization order:
//!   1. Clocks (HSI48 for USB, PLL1 for the core)
//!   2. Raise the DRV2605 enable pin
//!   3. I²C1 at 400 kHz, bind + init the DRV2605 (fatal on failure)
//!   4. Actuator configuration: topology, library, mode, go (logged, not fatal)
//!   5. UART command link, SAI amplifier, USB HID
//!   6. Spawn intake, serial playback, report playback and USB tasks
//!
//! Only step 3 can stop the boot. Every step of 4 is attempted and a failure
//! is recorded in the returned [`BootReport`].

use platform::config::{BOOT_LIBRARY, BOOT_TOPOLOGY};
use platform::{HapticDriver, Mode};

/// Ordered list of boot sequence steps for documentation and testing.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. RCC: HSI48 (USB) + PLL1 system clock",
    "2. GPIO: DRV_EN high",
    "3. I2C1: bind DRV2605 at 0x5A and run init (fatal on failure)",
    "4. DRV2605: topology, library, internal-trigger mode, go",
    "5. Peripherals: USART command link, SAI1 amplifier, USB OTG FS HID",
    "6. Embassy executor: spawn tasks",
];

/// One step of [`configure_actuator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootStep {
    /// `use_topology(BOOT_TOPOLOGY)`
    Topology,
    /// `select_library(BOOT_LIBRARY)`
    Library,
    /// `set_mode(InternalTrigger)`
    Mode,
    /// `go()`
    Go,
}

impl BootStep {
    /// Step name for log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Topology => "topology",
            Self::Library => "library",
            Self::Mode => "mode",
            Self::Go => "go",
        }
    }
}

/// Outcome of [`configure_actuator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootReport {
    failed: heapless::Vec<BootStep, 4>,
}

impl BootReport {
    /// Steps that failed, in order.
    pub fn failed(&self) -> &[BootStep] {
        &self.failed
    }

    /// Whether every step succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Put a freshly initialised actuator into its runtime configuration.
///
/// Every step is attempted; failures are logged and recorded, never fatal.
pub async fn configure_actuator<D: HapticDriver>(driver: &mut D) -> BootReport {
    info!("DRV2605 configuration");
    let mut report = BootReport::default();

    let results = [
        (BootStep::Topology, driver.use_topology(BOOT_TOPOLOGY).await),
        (BootStep::Library, driver.select_library(BOOT_LIBRARY).await),
        (BootStep::Mode, driver.set_mode(Mode::InternalTrigger).await),
        (BootStep::Go, driver.go().await),
    ];
    for (step, result) in results {
        if let Err(e) = result {
            warn!("DRV2605 configuration: {} failed: {}", step.as_str(), e.as_str());
            let _ = report.failed.push(step);
        }
    }

    info!("DRV2605 configuration done ({} failed)", report.failed.len());
    report
}

/// Clock tree for the haptic bridge.
///
/// # Clock Tree (HSI → 400 MHz core)
///
/// HSI (64 MHz) → PLL1 (prediv=4, mul=50) → PLL1_P = 400 MHz (sys)
/// PLL1_Q: DIV4 → 200 MHz (SAI1 kernel clock, default mux)
/// AHB prescaler: DIV2 → 200 MHz
/// APB1/2/3/4:    DIV2 → 100 MHz (I²C1, USART3 kernel clocks)
/// HSI48 with CRS synchronised from USB SOF → USB OTG FS
#[cfg(feature = "hardware")]
pub fn build_embassy_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();

    // ── Oscillators ─────────────────────────────────────────────────────────
    config.rcc.hsi = Some(HSIPrescaler::DIV1);
    config.rcc.csi = true;
    // USB OTG FS needs a 48 MHz clock; CRS trims HSI48 against SOF.
    config.rcc.hsi48 = Some(Hsi48Config { sync_from_usb: true });

    // ── PLL1: system clock + SAI kernel clock ───────────────────────────────
    config.rcc.pll1 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL50,
        divp: Some(PllDiv::DIV2), // 400 MHz system clock
        divq: Some(PllDiv::DIV4), // 200 MHz SAI1
        divr: None,
    });

    // ── System clock + bus prescalers ────────────────────────────────────────
    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = AHBPrescaler::DIV2;
    config.rcc.apb1_pre = APBPrescaler::DIV2;
    config.rcc.apb2_pre = APBPrescaler::DIV2;
    config.rcc.apb3_pre = APBPrescaler::DIV2;
    config.rcc.apb4_pre = APBPrescaler::DIV2;
    config.rcc.voltage_scale = VoltageScale::Scale1;

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptic::mock::{ActuatorCall, MockActuator};
    use platform::Topology;

    #[test]
    fn driver_init_precedes_configuration_and_tasks() {
        let pos = |needle: &str| BOOT_SEQUENCE_STEPS.iter().position(|s| s.contains(needle)).unwrap();
        assert!(pos("bind DRV2605") < pos("topology"));
        assert!(pos("topology") < pos("spawn"));
    }

    #[tokio::test]
    async fn configuration_runs_in_order() {
        let mut driver = MockActuator::new();
        let report = configure_actuator(&mut driver).await;
        assert!(report.is_clean());
        assert_eq!(
            driver.calls(),
            &[
                ActuatorCall::UseLra,
                ActuatorCall::SelectLibrary(1),
                ActuatorCall::SetMode(Mode::InternalTrigger),
                ActuatorCall::Go,
            ]
        );
        assert_eq!(driver.topology, Topology::Lra);
    }

    #[tokio::test]
    async fn failures_are_recorded_and_boot_continues() {
        let mut driver = MockActuator::new().fail_on_call(1);
        let report = configure_actuator(&mut driver).await;
        assert_eq!(report.failed(), &[BootStep::Library]);
        assert_eq!(driver.calls().len(), 4);
        assert!(driver.playing);
    }
}
