//! Haptic Bridge Firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI. This is the composition root:
//! every shared object (actuator slot, command queue, report channel) is
//! created here and handed to the tasks by reference.
//!
//! # Pin assignments
//!
//! | Signal        | MCU pin   | Notes                              |
//! |---------------|-----------|------------------------------------|
//! | DRV2605 EN    | PE15      | push-pull, high = enabled          |
//! | DRV2605 SCL   | PB8       | I2C1, 400 kHz                      |
//! | DRV2605 SDA   | PB9       | I2C1                               |
//! | Command TX    | PD8       | USART3 (ST-LINK VCP), 115200 8N1   |
//! | Command RX    | PD9       | USART3                             |
//! | Amp BCLK      | PE5       | SAI1 block A                       |
//! | Amp LRCLK     | PE4       | SAI1 block A                       |
//! | Amp DIN       | PE6       | SAI1 block A                       |
//! | USB D-        | PA11      | OTG FS                             |
//! | USB D+        | PA12      | OTG FS                             |

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::peripherals;
use embassy_stm32::sai::{self, Sai};
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{self, BufferedUart};
use embassy_stm32::{bind_interrupts, usb_otg};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Timer};
use embassy_usb::class::hid::HidReader;
use embassy_usb::UsbDevice;
use static_cell::StaticCell;

use firmware::sai_sink::{sai_config, SaiSink, DMA_BUFFER_WORDS};
use firmware::usb::{ReportChannel, ReportForwarder};
use firmware::{
    configure_actuator, run_report_playback, run_serial_playback, CommandQueue, Drv2605, SamplePlayer,
    SerialIntake, SharedActuator,
};
use platform::config::{
    APP_NAME, APP_VERSION, COMMAND_QUEUE_DEPTH, DRV2605_I2C_ADDR, I2C_FREQUENCY_HZ, SAMPLE_SLOTS, SERIAL_BAUD,
};
use platform::{AudioConfig, StaticStorage, TimeoutSerial};

use {defmt_rtt as _, panic_probe as _};

// Samples linked in by build.rs from $SAMPLE_DIR (empty if unset).
include!(concat!(env!("OUT_DIR"), "/samples.rs"));

bind_interrupts!(struct Irqs {
    I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
    USART3 => usart::BufferedInterruptHandler<peripherals::USART3>;
    OTG_FS => usb_otg::InterruptHandler<peripherals::USB_OTG_FS>;
});

type ActuatorBus = I2c<'static, peripherals::I2C1, peripherals::DMA1_CH4, peripherals::DMA1_CH5>;
type Actuator = SharedActuator<CriticalSectionRawMutex, Drv2605<ActuatorBus>>;
type Queue = CommandQueue<CriticalSectionRawMutex, COMMAND_QUEUE_DEPTH>;
type Serial = TimeoutSerial<BufferedUart<'static, peripherals::USART3>>;
type Player = SamplePlayer<StaticStorage<SAMPLE_SLOTS>, SaiSink<'static, peripherals::SAI1>>;
type UsbDriver = usb_otg::Driver<'static, peripherals::USB_OTG_FS>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("{=str} v{=str}", APP_NAME, APP_VERSION);
    let p = embassy_stm32::init(firmware::boot::build_embassy_config());

    // ── DRV2605 ─────────────────────────────────────────────────────────────
    defmt::info!("ENABLE DRV2605");
    let _drv_en = Output::new(p.PE15, Level::High, Speed::Low);

    let i2c = I2c::new(
        p.I2C1,
        p.PB8,
        p.PB9,
        Irqs,
        p.DMA1_CH4,
        p.DMA1_CH5,
        Hertz(I2C_FREQUENCY_HZ),
        i2c::Config::default(),
    );
    let mut driver = match Drv2605::bind(i2c, DRV2605_I2C_ADDR).await {
        Ok(driver) => driver,
        Err(failure) => {
            defmt::error!("DRV2605 init failed: {=str}", failure.error.as_str());
            park().await
        }
    };
    let report = configure_actuator(&mut driver).await;
    if !report.is_clean() {
        defmt::warn!(
            "DRV2605 configuration incomplete: {} step(s) failed: {}",
            report.failed().len(),
            report.failed()
        );
    }

    static ACTUATOR: StaticCell<Actuator> = StaticCell::new();
    let actuator: &'static Actuator = ACTUATOR.init(SharedActuator::bound(driver));

    // ── Serial command link ─────────────────────────────────────────────────
    static QUEUE: StaticCell<Queue> = StaticCell::new();
    let queue: &'static Queue = QUEUE.init(CommandQueue::new());

    static UART_TX: StaticCell<[u8; 64]> = StaticCell::new();
    static UART_RX: StaticCell<[u8; 256]> = StaticCell::new();
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = SERIAL_BAUD;
    match BufferedUart::new(
        p.USART3,
        Irqs,
        p.PD9,
        p.PD8,
        UART_TX.init([0; 64]),
        UART_RX.init([0; 256]),
        uart_config,
    ) {
        Ok(uart) => {
            let intake = SerialIntake::new(TimeoutSerial::new(uart), queue);
            if spawner.spawn(intake_task(intake)).is_err() {
                defmt::error!("failed to spawn intake_task");
            }
        }
        Err(_) => defmt::error!("USART3 configuration rejected; serial intake disabled"),
    }

    // ── Sample playback ─────────────────────────────────────────────────────
    let mut storage = StaticStorage::new();
    for (id, data) in SAMPLES {
        if !storage.insert(*id, data) {
            defmt::warn!("sample table full, skipping {=u8}.wav", *id);
        }
    }
    defmt::info!("{=usize} sample(s) linked", SAMPLES.len());

    static SAI_DMA: StaticCell<[u16; DMA_BUFFER_WORDS]> = StaticCell::new();
    let (sai_a, _sai_b) = sai::split_subblocks(p.SAI1);
    let sai = Sai::new_asynchronous(
        sai_a,
        p.PE5,
        p.PE6,
        p.PE4,
        p.DMA1_CH0,
        SAI_DMA.init([0; DMA_BUFFER_WORDS]),
        sai_config(AudioConfig::default()),
    );
    let player = SamplePlayer::new(storage, SaiSink::new(sai));
    if spawner.spawn(serial_playback_task(queue, player)).is_err() {
        defmt::error!("failed to spawn serial_playback_task");
    }

    // ── USB HID ─────────────────────────────────────────────────────────────
    static REPORTS: StaticCell<ReportChannel> = StaticCell::new();
    let reports: &'static ReportChannel = REPORTS.init(ReportChannel::new());

    static EP_OUT_BUFFER: StaticCell<[u8; 256]> = StaticCell::new();
    let mut usb_config = usb_otg::Config::default();
    usb_config.vbus_detection = false;
    let usb_driver = usb_otg::Driver::new_fs(
        p.USB_OTG_FS,
        Irqs,
        p.PA12,
        p.PA11,
        EP_OUT_BUFFER.init([0; 256]),
        usb_config,
    );
    let (device, reader) = firmware::usb::build(usb_driver, reports);

    if spawner.spawn(usb_device_task(device)).is_err() {
        defmt::error!("failed to spawn usb_device_task");
    }
    if spawner.spawn(hid_reader_task(reader, ReportForwarder::new(reports))).is_err() {
        defmt::error!("failed to spawn hid_reader_task");
    }
    if spawner.spawn(report_playback_task(reports, actuator)).is_err() {
        defmt::error!("failed to spawn report_playback_task");
    }

    // Main loop - heartbeat
    defmt::info!("Entering main loop");
    let mut last_dropped = 0u32;
    loop {
        Timer::after(Duration::from_secs(10)).await;
        let dropped = queue.dropped();
        if dropped != last_dropped {
            defmt::warn!("command queue: {=u32} dropped so far", dropped);
            last_dropped = dropped;
        }
    }
}

/// Stop here after a fatal boot error, keeping the executor alive for RTT.
async fn park() -> ! {
    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}

#[embassy_executor::task]
async fn intake_task(intake: SerialIntake<'static, Serial, CriticalSectionRawMutex, COMMAND_QUEUE_DEPTH>) -> ! {
    intake.run().await
}

#[embassy_executor::task]
async fn serial_playback_task(queue: &'static Queue, mut player: Player) -> ! {
    run_serial_playback(queue, &mut player).await
}

#[embassy_executor::task]
async fn report_playback_task(reports: &'static ReportChannel, actuator: &'static Actuator) -> ! {
    run_report_playback(reports, actuator).await
}

#[embassy_executor::task]
async fn usb_device_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

#[embassy_executor::task]
async fn hid_reader_task(reader: HidReader<'static, UsbDriver, 16>, mut forwarder: ReportForwarder) -> ! {
    reader.run(true, &mut forwarder).await
}
