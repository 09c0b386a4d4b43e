// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
use embedded_hal::blocking::i2c;

/// Single-byte register access on a device.
///
/// This is the only capability the driver needs from the hardware. It is implemented for every
/// [`embedded-hal`][embedded_hal::blocking::i2c] I²C bus that implements both `Write` and
/// `WriteRead` with the same error type, so most users will never implement it themselves. Both
/// methods block until the transfer completes, or until the bus implementation gives up.
pub trait RegisterBus {
    type Error;

    /// Write `value` to the register at `register` on the device at `device_address`.
    fn write_register(
        &mut self,
        device_address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Self::Error>;

    /// Read the value of the register at `register` on the device at `device_address`.
    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8, Self::Error>;
}

impl<I2C, E> RegisterBus for I2C
where
    I2C: i2c::Write<Error = E> + i2c::WriteRead<Error = E>,
{
    type Error = E;

    fn write_register(
        &mut self,
        device_address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Self::Error> {
        self.write(device_address, &[register, value])
    }

    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.write_read(device_address, &[register], &mut value)?;
        Ok(value[0])
    }
}
