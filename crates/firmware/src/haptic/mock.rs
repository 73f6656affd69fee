//! Mock actuator and register-file bus for host-side testing
//!
//! [`MockActuator`] implements [`HapticDriver`] without any bus and records
//! every call for assertion. [`RegisterFileBus`] is one level lower: a fake
//! I²C device with a 256-byte register file, so the real [`super::Drv2605`]
//! can be exercised against observable register state.

use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
use platform::{HapticDriver, HapticError, Library, Mode, Topology, WaveformSlot};

/// Calls a [`MockActuator`] can record before further calls are dropped.
pub const MOCK_CALLS: usize = 64;

/// One recorded [`HapticDriver`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    /// `set_waveform(slot, effect)`
    SetWaveform {
        /// Sequencer slot.
        slot: u8,
        /// Effect id.
        effect: u8,
    },
    /// `select_library(library)`
    SelectLibrary(u8),
    /// `go()`
    Go,
    /// `stop()`
    Stop,
    /// `set_mode(mode)`
    SetMode(Mode),
    /// `set_realtime_value(amplitude)`
    SetRealtimeValue(u8),
    /// `use_erm()`
    UseErm,
    /// `use_lra()`
    UseLra,
    /// `status()`
    Status,
}

/// Bus error injected by [`MockActuator::fail_on_call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

/// Mock actuator. Records all calls for test assertions.
///
/// Arguments are validated like the real driver: an out-of-range slot or
/// library fails with `InvalidArgument` and is not recorded.
pub struct MockActuator {
    calls: heapless::Vec<ActuatorCall, MOCK_CALLS>,
    fail_on: Option<usize>,
    /// Sequencer contents.
    pub sequence: [u8; 8],
    /// Selected library.
    pub library: u8,
    /// Current mode.
    pub mode: Mode,
    /// Configured topology.
    pub topology: Topology,
    /// Whether `go` was the last trigger call.
    pub playing: bool,
}

impl MockActuator {
    /// Create a new mock actuator in its post-init state.
    pub fn new() -> Self {
        Self {
            calls: heapless::Vec::new(),
            fail_on: None,
            sequence: [1, 0, 0, 0, 0, 0, 0, 0],
            library: 0,
            mode: Mode::InternalTrigger,
            topology: Topology::Erm,
            playing: false,
        }
    }

    /// Make the `index`-th recorded call (0-based) fail with a bus error.
    pub fn fail_on_call(mut self, index: usize) -> Self {
        self.fail_on = Some(index);
        self
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> &[ActuatorCall] {
        &self.calls
    }

    fn record(&mut self, call: ActuatorCall) -> Result<(), HapticError<MockBusError>> {
        let index = self.calls.len();
        let _ = self.calls.push(call);
        if self.fail_on == Some(index) {
            Err(HapticError::Bus(MockBusError))
        } else {
            Ok(())
        }
    }
}

impl Default for MockActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl HapticDriver for MockActuator {
    type BusError = MockBusError;

    async fn set_waveform(&mut self, slot: u8, effect: u8) -> Result<(), HapticError<MockBusError>> {
        let checked = WaveformSlot::try_new(slot)
            .map_err(|e| HapticError::InvalidArgument { what: "slot", value: e.value })?;
        self.record(ActuatorCall::SetWaveform { slot, effect })?;
        if let Some(entry) = self.sequence.get_mut(usize::from(checked.index())) {
            *entry = effect;
        }
        Ok(())
    }

    async fn select_library(&mut self, library: u8) -> Result<(), HapticError<MockBusError>> {
        let checked = Library::try_new(library)
            .map_err(|e| HapticError::InvalidArgument { what: "library", value: e.value })?;
        self.record(ActuatorCall::SelectLibrary(library))?;
        self.library = checked.get();
        Ok(())
    }

    async fn go(&mut self) -> Result<(), HapticError<MockBusError>> {
        self.record(ActuatorCall::Go)?;
        self.playing = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), HapticError<MockBusError>> {
        self.record(ActuatorCall::Stop)?;
        self.playing = false;
        Ok(())
    }

    async fn set_mode(&mut self, mode: Mode) -> Result<(), HapticError<MockBusError>> {
        self.record(ActuatorCall::SetMode(mode))?;
        self.mode = mode;
        Ok(())
    }

    async fn set_realtime_value(&mut self, amplitude: u8) -> Result<(), HapticError<MockBusError>> {
        self.record(ActuatorCall::SetRealtimeValue(amplitude))
    }

    async fn use_erm(&mut self) -> Result<(), HapticError<MockBusError>> {
        self.record(ActuatorCall::UseErm)?;
        self.topology = Topology::Erm;
        Ok(())
    }

    async fn use_lra(&mut self) -> Result<(), HapticError<MockBusError>> {
        self.record(ActuatorCall::UseLra)?;
        self.topology = Topology::Lra;
        Ok(())
    }

    async fn status(&mut self) -> Result<u8, HapticError<MockBusError>> {
        self.record(ActuatorCall::Status)?;
        Ok(0xE0)
    }
}

// ---------------------------------------------------------------------------
// RegisterFileBus
// ---------------------------------------------------------------------------

/// Fake I²C device with a 256-byte register file and an auto-incrementing
/// register pointer.
///
/// A write's first byte sets the pointer and the rest are stored from there;
/// a read returns bytes from the pointer onwards. Transactions to any other
/// address are NACKed.
pub struct RegisterFileBus {
    address: u8,
    regs: [u8; 256],
    pointer: u8,
    fail_reads_of: Option<u8>,
    fail_writes_of: Option<u8>,
}

impl RegisterFileBus {
    /// A device at `address` with every register zero.
    pub fn new(address: u8) -> Self {
        Self {
            address,
            regs: [0; 256],
            pointer: 0,
            fail_reads_of: None,
            fail_writes_of: None,
        }
    }

    /// Current value of `reg`.
    pub fn reg(&self, reg: u8) -> u8 {
        self.regs.get(usize::from(reg)).copied().unwrap_or_default()
    }

    /// Preset `reg` to `value`.
    pub fn set_reg(&mut self, reg: u8, value: u8) {
        if let Some(slot) = self.regs.get_mut(usize::from(reg)) {
            *slot = value;
        }
    }

    /// Make every read of `reg` fail.
    pub fn fail_reads_of(&mut self, reg: Option<u8>) {
        self.fail_reads_of = reg;
    }

    /// Make every write of `reg` fail.
    pub fn fail_writes_of(&mut self, reg: Option<u8>) {
        self.fail_writes_of = reg;
    }

    fn apply(&mut self, op: &mut Operation<'_>) -> Result<(), ErrorKind> {
        match op {
            Operation::Write(bytes) => {
                let Some((&reg, data)) = bytes.split_first() else {
                    return Ok(());
                };
                self.pointer = reg;
                if !data.is_empty() && self.fail_writes_of == Some(reg) {
                    return Err(ErrorKind::Other);
                }
                for &byte in data {
                    self.set_reg(self.pointer, byte);
                    self.pointer = self.pointer.wrapping_add(1);
                }
                Ok(())
            }
            Operation::Read(buf) => {
                if self.fail_reads_of == Some(self.pointer) {
                    return Err(ErrorKind::Other);
                }
                for byte in buf.iter_mut() {
                    *byte = self.reg(self.pointer);
                    self.pointer = self.pointer.wrapping_add(1);
                }
                Ok(())
            }
        }
    }
}

impl ErrorType for RegisterFileBus {
    type Error = ErrorKind;
}

impl embedded_hal_async::i2c::I2c for RegisterFileBus {
    async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations.iter_mut() {
            self.apply(op)?;
        }
        Ok(())
    }
}
