//! DRV2605 haptic driver
//!
//! Communicates with the chip via I²C. Uses the `embedded_hal_async::i2c::I2c`
//! trait so it is HAL-agnostic while remaining async. Host tests drive it
//! with `embedded-hal-mock`; the hardware build hands it an embassy-stm32
//! `I2c` in async mode.
//!
//! # I²C Address
//!
//! The DRV2605 has a fixed address, `0x5A`.

use embedded_hal_async::i2c::I2c;
use platform::{HapticDriver, HapticError, Library, Mode, WaveformSlot};

use super::bus::RegisterBus;
use super::registers::*;

/// Initialisation failed; the bus handle is handed back to the caller.
pub struct InitFailure<I, E> {
    /// The released bus handle.
    pub i2c: I,
    /// The error that aborted initialisation.
    pub error: HapticError<E>,
}

/// DRV2605 haptic driver
pub struct Drv2605<I> {
    bus: RegisterBus<I>,
}

impl<I: I2c> Drv2605<I> {
    /// Wrap `i2c` without touching the device. Call [`Self::init`] next.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { bus: RegisterBus::new(i2c, address) }
    }

    /// Bind the device at `address` and initialise it.
    ///
    /// On failure the bus handle is returned inside [`InitFailure`] so the
    /// caller can report and reuse it.
    pub async fn bind(i2c: I, address: u8) -> Result<Self, InitFailure<I, I::Error>> {
        let mut driver = Self::new(i2c, address);
        match driver.init().await {
            Ok(()) => Ok(driver),
            Err(error) => Err(InitFailure { i2c: driver.release(), error }),
        }
    }

    /// Bring the device out of standby into a known state.
    ///
    /// Leaves the sequencer holding a single strong click, every timing
    /// offset zeroed and the drive configured for ERM open loop. Aborts on
    /// the first failed transaction.
    pub async fn init(&mut self) -> Result<(), HapticError<I::Error>> {
        info!("DRV2605: init at address {}", self.bus.address());

        self.bus.write(REG_MODE, Mode::InternalTrigger.bits()).await?;
        self.bus.write(REG_RTPIN, 0x00).await?;

        self.bus.write(REG_WAVESEQ1, EFFECT_STRONG_CLICK).await?;
        self.bus.write(REG_WAVESEQ2, EFFECT_END).await?;

        for reg in [REG_OVERDRIVE, REG_SUSTAINPOS, REG_SUSTAINNEG, REG_BRAKE] {
            self.bus.write(reg, 0x00).await?;
        }
        self.bus.write(REG_AUDIOMAX, AUDIOMAX_DEFAULT).await?;

        // ERM
        let feedback = self.bus.read(REG_FEEDBACK).await?;
        self.bus.write(REG_FEEDBACK, feedback & !FEEDBACK_N_ERM_LRA).await?;

        // Open loop
        let control3 = self.bus.read(REG_CONTROL3).await?;
        self.bus.write(REG_CONTROL3, control3 | CONTROL3_ERM_OPEN_LOOP).await?;

        info!("DRV2605: init complete");
        Ok(())
    }

    /// Give the bus handle back.
    pub fn release(self) -> I {
        self.bus.release()
    }

    /// Read both topology registers, then write both with the bits set or
    /// cleared. A failed read leaves the device untouched; a failed CONTROL3
    /// write puts FEEDBACK back to what it held before.
    async fn write_topology_bits(&mut self, lra: bool) -> Result<(), HapticError<I::Error>> {
        let original_feedback = self.bus.read(REG_FEEDBACK).await?;
        let control3 = self.bus.read(REG_CONTROL3).await?;
        let (feedback, control3) = if lra {
            (original_feedback | FEEDBACK_N_ERM_LRA, control3 | CONTROL3_ERM_OPEN_LOOP)
        } else {
            (original_feedback & !FEEDBACK_N_ERM_LRA, control3 & !CONTROL3_ERM_OPEN_LOOP)
        };
        self.bus.write(REG_FEEDBACK, feedback).await?;
        if let Err(error) = self.bus.write(REG_CONTROL3, control3).await {
            if self.bus.write(REG_FEEDBACK, original_feedback).await.is_err() {
                error!("FEEDBACK restore failed, topology bits disagree");
            }
            return Err(error);
        }
        Ok(())
    }
}

impl<I: I2c> HapticDriver for Drv2605<I> {
    type BusError = I::Error;

    async fn set_waveform(&mut self, slot: u8, effect: u8) -> Result<(), HapticError<I::Error>> {
        let slot = WaveformSlot::try_new(slot)
            .map_err(|e| HapticError::InvalidArgument { what: "slot", value: e.value })?;
        self.bus.write(waveseq(slot), effect).await
    }

    async fn select_library(&mut self, library: u8) -> Result<(), HapticError<I::Error>> {
        let library = Library::try_new(library)
            .map_err(|e| HapticError::InvalidArgument { what: "library", value: e.value })?;
        self.bus.write(REG_LIBRARY, library.get()).await
    }

    async fn go(&mut self) -> Result<(), HapticError<I::Error>> {
        self.bus.write(REG_GO, GO_START).await
    }

    async fn stop(&mut self) -> Result<(), HapticError<I::Error>> {
        self.bus.write(REG_GO, GO_STOP).await
    }

    async fn set_mode(&mut self, mode: Mode) -> Result<(), HapticError<I::Error>> {
        self.bus.write(REG_MODE, mode.bits()).await
    }

    async fn set_realtime_value(&mut self, amplitude: u8) -> Result<(), HapticError<I::Error>> {
        self.bus.write(REG_RTPIN, amplitude).await
    }

    async fn use_erm(&mut self) -> Result<(), HapticError<I::Error>> {
        self.write_topology_bits(false).await
    }

    async fn use_lra(&mut self) -> Result<(), HapticError<I::Error>> {
        self.write_topology_bits(true).await
    }

    async fn status(&mut self) -> Result<u8, HapticError<I::Error>> {
        self.bus.read(REG_STATUS).await
    }
}
