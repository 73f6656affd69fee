//! Single-byte register access over I²C.
//!
//! [`RegisterBus`] owns the bus handle and the device address. Every
//! transaction is bounded by [`BUS_TIMEOUT_MS`]; nothing retries.

use embassy_time::{with_timeout, Duration};
use embedded_hal_async::i2c::I2c;
use platform::config::BUS_TIMEOUT_MS;
use platform::HapticError;

const BUS_TIMEOUT: Duration = Duration::from_millis(BUS_TIMEOUT_MS);

/// Addressed register interface of one I²C device.
pub struct RegisterBus<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> RegisterBus<I> {
    /// Bind `i2c` to the device at 7-bit `address`.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address this bus is bound to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Write `value` to `reg` as one `[reg, value]` transaction.
    pub async fn write(&mut self, reg: u8, value: u8) -> Result<(), HapticError<I::Error>> {
        match with_timeout(BUS_TIMEOUT, self.i2c.write(self.address, &[reg, value])).await {
            Ok(res) => res.map_err(HapticError::Bus),
            Err(_) => Err(HapticError::Timeout),
        }
    }

    /// Read `reg`: one address byte out, one data byte back.
    pub async fn read(&mut self, reg: u8) -> Result<u8, HapticError<I::Error>> {
        let mut value = [0u8; 1];
        match with_timeout(BUS_TIMEOUT, self.i2c.write_read(self.address, &[reg], &mut value)).await {
            Ok(res) => res.map_err(HapticError::Bus)?,
            Err(_) => return Err(HapticError::Timeout),
        }
        let [byte] = value;
        Ok(byte)
    }

    /// Give the bus handle back.
    pub fn release(self) -> I {
        self.i2c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    const ADDR: u8 = 0x5A;

    #[tokio::test]
    async fn write_is_one_two_byte_transaction() {
        let expectations = [Transaction::write(ADDR, vec![0x0C, 0x01])];
        let mock = I2cMock::new(&expectations);
        let mut bus = RegisterBus::new(mock, ADDR);
        bus.write(0x0C, 0x01).await.unwrap();
        bus.release().done();
    }

    #[tokio::test]
    async fn read_is_write_then_read_of_one_byte() {
        let expectations = [Transaction::write_read(ADDR, vec![0x1A], vec![0xB6])];
        let mock = I2cMock::new(&expectations);
        let mut bus = RegisterBus::new(mock, ADDR);
        assert_eq!(bus.read(0x1A).await.unwrap(), 0xB6);
        bus.release().done();
    }

    #[tokio::test]
    async fn transport_error_is_propagated() {
        let expectations = [Transaction::write(ADDR, vec![0x01, 0x00]).with_error(ErrorKind::Other)];
        let mock = I2cMock::new(&expectations);
        let mut bus = RegisterBus::new(mock, ADDR);
        assert_eq!(bus.write(0x01, 0x00).await, Err(HapticError::Bus(ErrorKind::Other)));
        bus.release().done();
    }
}
