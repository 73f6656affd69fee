//! DRV2605 haptic driver module (Texas Instruments)
//!
//! The driver is generic over `embedded_hal_async::i2c::I2c`, so it is
//! compiled and tested on the host as well as on hardware.

pub mod bus;
mod driver;
pub mod registers;

pub use bus::RegisterBus;
pub use driver::{Drv2605, InitFailure};
