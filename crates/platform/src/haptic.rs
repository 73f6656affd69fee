//! Haptic actuator abstraction
//!
//! [`HapticDriver`] is the semantic interface of a waveform-sequencer haptic
//! driver IC (DRV2605 class). Concrete drivers live in the firmware crate;
//! this module only carries the trait, its error type and the small domain
//! newtypes shared by every implementation.
//!
//! Raw `u8` arguments are accepted at the trait boundary and validated by the
//! implementation, so an out-of-range slot or library surfaces as
//! [`HapticError::InvalidArgument`] instead of being written to the device.

// ── Error types ─────────────────────────────────────────────────────────────

/// Error returned when a value is outside its valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The rejected value.
    pub value: u8,
    /// The inclusive maximum allowed value.
    pub max: u8,
}

/// Errors produced by a [`HapticDriver`].
///
/// `E` is the transport error of the underlying register bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HapticError<E> {
    /// No device is bound (the actuator slot is empty).
    InvalidHandle,
    /// An argument was rejected before anything reached the bus.
    InvalidArgument {
        /// Which argument was rejected (`"slot"`, `"library"`, ...).
        what: &'static str,
        /// The rejected value.
        value: u8,
    },
    /// A register transaction did not complete within the bus timeout.
    Timeout,
    /// The transport reported an error.
    Bus(E),
}

impl<E> HapticError<E> {
    /// Short static description, suitable for log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidHandle => "no actuator bound",
            Self::InvalidArgument { .. } => "invalid argument",
            Self::Timeout => "bus timeout",
            Self::Bus(_) => "bus error",
        }
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for HapticError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidArgument { what, value } => {
                write!(f, "invalid argument: {what}={value}")
            }
            #[allow(clippy::use_debug)]
            Self::Bus(e) => write!(f, "bus error: {e:?}"),
            other => f.write_str(other.as_str()),
        }
    }
}

// ── WaveformSlot ────────────────────────────────────────────────────────────

/// Index into the device's eight-entry waveform sequencer (0–7).
///
/// Slot 0 plays first; a slot holding effect id 0 terminates the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct WaveformSlot(u8);

impl WaveformSlot {
    /// Highest valid slot index.
    pub const MAX: u8 = 7;

    /// Validate a raw slot index.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `index > 7`.
    pub fn try_new(index: u8) -> Result<Self, OutOfRangeError> {
        if index > Self::MAX {
            Err(OutOfRangeError { value: index, max: Self::MAX })
        } else {
            Ok(Self(index))
        }
    }

    /// The slot index (0–7).
    pub fn index(self) -> u8 {
        self.0
    }
}

// ── Library ─────────────────────────────────────────────────────────────────

/// Built-in effect library selector (0–7).
///
/// On the DRV2605, 0 is empty, 1–5 are the ERM libraries A–E, 6 is the LRA
/// library and 7 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Library(u8);

impl Library {
    /// Highest valid library selector.
    pub const MAX: u8 = 7;

    /// Validate a raw library selector.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `library > 7`.
    pub fn try_new(library: u8) -> Result<Self, OutOfRangeError> {
        if library > Self::MAX {
            Err(OutOfRangeError { value: library, max: Self::MAX })
        } else {
            Ok(Self(library))
        }
    }

    /// The raw selector value.
    pub fn get(self) -> u8 {
        self.0
    }
}

// ── Mode ────────────────────────────────────────────────────────────────────

/// Operating mode of the driver IC (MODE register bits 2:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Waveforms are fired by writing GO.
    InternalTrigger = 0,
    /// A rising edge on IN/TRIG fires GO; a falling edge does not cancel.
    ExternalTriggerEdge = 1,
    /// GO follows the IN/TRIG pin level.
    ExternalTriggerLevel = 2,
    /// IN/TRIG is a PWM or analog input.
    PwmAnalog = 3,
    /// IN/TRIG drives the actuator from an AC-coupled audio signal.
    AudioToVibe = 4,
    /// The RTPIN register drives the actuator directly.
    RealTimePlayback = 5,
    /// Actuator diagnostics run on GO.
    Diagnostics = 6,
    /// Auto-calibration runs on GO.
    AutoCalibration = 7,
}

impl Mode {
    /// Register encoding of this mode.
    pub fn bits(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Mode {
    type Error = OutOfRangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::InternalTrigger,
            1 => Self::ExternalTriggerEdge,
            2 => Self::ExternalTriggerLevel,
            3 => Self::PwmAnalog,
            4 => Self::AudioToVibe,
            5 => Self::RealTimePlayback,
            6 => Self::Diagnostics,
            7 => Self::AutoCalibration,
            _ => return Err(OutOfRangeError { value, max: 7 }),
        })
    }
}

// ── Topology ────────────────────────────────────────────────────────────────

/// Actuator type the driver is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Topology {
    /// Eccentric rotating mass, open loop.
    Erm,
    /// Linear resonant actuator.
    Lra,
}

// ── HapticDriver ────────────────────────────────────────────────────────────

/// Haptic driver trait.
///
/// Every method is a single register-level operation (or one read-modify-write
/// group); nothing retries.
pub trait HapticDriver {
    /// Transport error of the underlying register bus.
    type BusError: core::fmt::Debug;

    /// Program sequencer `slot` (0–7) with effect `effect` (0 ends the sequence).
    fn set_waveform(
        &mut self,
        slot: u8,
        effect: u8,
    ) -> impl core::future::Future<Output = Result<(), HapticError<Self::BusError>>>;

    /// Select the built-in effect library (0–7).
    fn select_library(
        &mut self,
        library: u8,
    ) -> impl core::future::Future<Output = Result<(), HapticError<Self::BusError>>>;

    /// Start the programmed sequence.
    fn go(&mut self) -> impl core::future::Future<Output = Result<(), HapticError<Self::BusError>>>;

    /// Stop playback and rewind the sequence pointer.
    fn stop(
        &mut self,
    ) -> impl core::future::Future<Output = Result<(), HapticError<Self::BusError>>>;

    /// Change operating mode. Never starts playback.
    fn set_mode(
        &mut self,
        mode: Mode,
    ) -> impl core::future::Future<Output = Result<(), HapticError<Self::BusError>>>;

    /// Set the real-time playback amplitude.
    fn set_realtime_value(
        &mut self,
        amplitude: u8,
    ) -> impl core::future::Future<Output = Result<(), HapticError<Self::BusError>>>;

    /// Configure for an ERM actuator (open loop).
    fn use_erm(
        &mut self,
    ) -> impl core::future::Future<Output = Result<(), HapticError<Self::BusError>>>;

    /// Configure for an LRA actuator.
    fn use_lra(
        &mut self,
    ) -> impl core::future::Future<Output = Result<(), HapticError<Self::BusError>>>;

    /// Read the raw status register.
    fn status(
        &mut self,
    ) -> impl core::future::Future<Output = Result<u8, HapticError<Self::BusError>>>;

    /// Configure for `topology`.
    fn use_topology(
        &mut self,
        topology: Topology,
    ) -> impl core::future::Future<Output = Result<(), HapticError<Self::BusError>>> {
        async move {
            match topology {
                Topology::Erm => self.use_erm().await,
                Topology::Lra => self.use_lra().await,
            }
        }
    }
}

/// An empty actuator slot: every operation fails with
/// [`HapticError::InvalidHandle`] without touching a bus.
impl<D: HapticDriver> HapticDriver for Option<D> {
    type BusError = D::BusError;

    async fn set_waveform(&mut self, slot: u8, effect: u8) -> Result<(), HapticError<D::BusError>> {
        self.as_mut().ok_or(HapticError::InvalidHandle)?.set_waveform(slot, effect).await
    }

    async fn select_library(&mut self, library: u8) -> Result<(), HapticError<D::BusError>> {
        self.as_mut().ok_or(HapticError::InvalidHandle)?.select_library(library).await
    }

    async fn go(&mut self) -> Result<(), HapticError<D::BusError>> {
        self.as_mut().ok_or(HapticError::InvalidHandle)?.go().await
    }

    async fn stop(&mut self) -> Result<(), HapticError<D::BusError>> {
        self.as_mut().ok_or(HapticError::InvalidHandle)?.stop().await
    }

    async fn set_mode(&mut self, mode: Mode) -> Result<(), HapticError<D::BusError>> {
        self.as_mut().ok_or(HapticError::InvalidHandle)?.set_mode(mode).await
    }

    async fn set_realtime_value(&mut self, amplitude: u8) -> Result<(), HapticError<D::BusError>> {
        self.as_mut()
            .ok_or(HapticError::InvalidHandle)?
            .set_realtime_value(amplitude)
            .await
    }

    async fn use_erm(&mut self) -> Result<(), HapticError<D::BusError>> {
        self.as_mut().ok_or(HapticError::InvalidHandle)?.use_erm().await
    }

    async fn use_lra(&mut self) -> Result<(), HapticError<D::BusError>> {
        self.as_mut().ok_or(HapticError::InvalidHandle)?.use_lra().await
    }

    async fn status(&mut self) -> Result<u8, HapticError<D::BusError>> {
        self.as_mut().ok_or(HapticError::InvalidHandle)?.status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_accepts_zero_through_seven() {
        for i in 0..=7u8 {
            assert_eq!(WaveformSlot::try_new(i).map(WaveformSlot::index), Ok(i));
        }
    }

    #[test]
    fn slot_rejects_eight() {
        assert_eq!(WaveformSlot::try_new(8), Err(OutOfRangeError { value: 8, max: 7 }));
    }

    #[test]
    fn library_rejects_above_seven() {
        assert!(Library::try_new(7).is_ok());
        assert!(Library::try_new(8).is_err());
    }

    #[test]
    fn mode_round_trips_through_bits() {
        for bits in 0..=7u8 {
            let mode = Mode::try_from(bits).unwrap();
            assert_eq!(mode.bits(), bits);
        }
        assert!(Mode::try_from(8).is_err());
    }

    #[test]
    fn display_names_the_rejected_argument() {
        let err: HapticError<()> = HapticError::InvalidArgument { what: "slot", value: 9 };
        assert_eq!(std::format!("{err}"), "invalid argument: slot=9");
    }
}
