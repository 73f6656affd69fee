//! Haptic actuator subsystem
//!
//! - [`drv2605`]: register map and driver for the TI DRV2605
//! - [`shared`]: mutex-guarded actuator slot shared between tasks
//! - [`mock`]: call-recording actuator and fake register bus for tests

pub mod drv2605;
pub mod mock;
pub mod shared;

pub use drv2605::{Drv2605, InitFailure, RegisterBus};
pub use mock::{ActuatorCall, MockActuator, MockBusError, RegisterFileBus};
pub use shared::SharedActuator;
