// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::blocking::i2c;

/// The Grid-EYE has a single 8-bit register address space.
pub const REGISTER_COUNT: usize = 0x100;

/// First register of the pixel output table.
pub const PIXEL_BASE: u8 = 0x80;

/// Number of bytes in the pixel output table (64 pixels, two bytes each).
pub const PIXEL_TABLE_LENGTH: usize = 128;

const THERMISTOR_LOW: u8 = 0x0E;

// Enough to hold every operation in one capture, plus some setup traffic.
const RECENT_OPERATIONS_QUEUE_LENGTH: usize = 256;

/// Registers the controller is allowed to write, with a mask of the writeable bits.
///
/// Power control, reset, frame rate, interrupt control, status clear, average, and the interrupt
/// levels.
const WRITE_MASKS: [(u8, u8); 13] = [
    (0x00, 0xFF),
    (0x01, 0xFF),
    (0x02, 0x01),
    (0x03, 0x03),
    (0x05, 0x0E),
    (0x07, 0x20),
    (0x08, 0xFF),
    (0x09, 0x0F),
    (0x0A, 0xFF),
    (0x0B, 0x0F),
    (0x0C, 0xFF),
    (0x0D, 0x0F),
    // The moving average unlock sequence is written here.
    (0x1F, 0xFF),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MockError {
    /// An unknown I²C address was given.
    UnknownI2cAddress(u8),

    /// The given register should not be written to.
    IllegalWriteAddress(u8),

    /// The given value sets bits that are reserved in the given register.
    IllegalWriteValue(u8, u8),

    /// The requested operation is not allowed.
    ///
    /// This covers situations such as:
    /// * A write with no register address.
    /// * A write-read that writes anything other than a single register address.
    /// * A write-read with a 0-length read.
    IllegalOperation,

    /// A failure injected by the test through [`MockGridEye::fail_on_register`].
    Injected(u8),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum I2cOperation {
    Write { register: u8, value: u8 },
    Read { register: u8, length: usize },
}

/// An in-memory Grid-EYE.
///
/// Clones share the same register file, so a test can keep a handle to the mock after moving a
/// clone into a driver, then inspect or change the "sensor" state.
#[derive(Clone, Debug)]
pub struct MockGridEye {
    i2c_address: u8,
    registers: Rc<RefCell<[u8; REGISTER_COUNT]>>,
    recent_operations: Rc<RefCell<VecDeque<I2cOperation>>>,
    failing_register: Rc<Cell<Option<u8>>>,
}

impl MockGridEye {
    /// Create a mock sensor with every register cleared.
    pub fn new(i2c_address: u8) -> Self {
        Self {
            i2c_address,
            registers: Rc::new(RefCell::new([0u8; REGISTER_COUNT])),
            recent_operations: Rc::new(RefCell::new(VecDeque::new())),
            failing_register: Rc::new(Cell::new(None)),
        }
    }

    /// Access the raw value of a register.
    pub fn register(&self, register: u8) -> u8 {
        self.registers.borrow()[register as usize]
    }

    /// Replace the pixel output table, simulating a new frame from the sensor.
    pub fn update_frame(&self, pixel_data: &[u8; PIXEL_TABLE_LENGTH]) {
        let start = PIXEL_BASE as usize;
        self.registers.borrow_mut()[start..(start + PIXEL_TABLE_LENGTH)]
            .copy_from_slice(pixel_data);
    }

    /// Set the raw value of a single pixel.
    pub fn set_pixel(&self, index: usize, low: u8, high: u8) {
        let offset = PIXEL_BASE as usize + index * 2;
        let mut registers = self.registers.borrow_mut();
        registers[offset] = low;
        registers[offset + 1] = high;
    }

    /// Set the raw thermistor value.
    pub fn set_thermistor(&self, low: u8, high: u8) {
        let mut registers = self.registers.borrow_mut();
        registers[THERMISTOR_LOW as usize] = low;
        registers[THERMISTOR_LOW as usize + 1] = high;
    }

    /// Make every access to the given register fail, or clear the failure with `None`.
    pub fn fail_on_register(&self, register: Option<u8>) {
        self.failing_register.set(register);
    }

    fn check_failure(&self, register: u8, length: usize) -> Result<(), MockError> {
        match self.failing_register.get() {
            Some(failing)
                if (register as usize..register as usize + length)
                    .any(|r| r == failing as usize) =>
            {
                Err(MockError::Injected(failing))
            }
            _ => Ok(()),
        }
    }

    fn add_operation(&self, operation: I2cOperation) {
        let mut recent_ops = self.recent_operations.borrow_mut();
        recent_ops.push_back(operation);
        while recent_ops.len() > RECENT_OPERATIONS_QUEUE_LENGTH {
            recent_ops.pop_front();
        }
    }

    /// The most recent operations, oldest first.
    pub fn recent_operations(&self) -> Ref<VecDeque<I2cOperation>> {
        self.recent_operations.borrow()
    }

    pub fn clear_recent_operations(&self) {
        self.recent_operations.borrow_mut().clear()
    }
}

impl i2c::Write for MockGridEye {
    type Error = MockError;

    fn write(&mut self, i2c_address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        if i2c_address != self.i2c_address {
            return Err(MockError::UnknownI2cAddress(i2c_address));
        }
        let (register, payload) = match bytes.split_first() {
            Some((register, payload)) if !payload.is_empty() => (*register, payload),
            _ => return Err(MockError::IllegalOperation),
        };
        self.check_failure(register, payload.len())?;
        // Check the entire write before changing anything.
        for (offset, value) in payload.iter().enumerate() {
            let target = register.wrapping_add(offset as u8);
            let mask = WRITE_MASKS
                .iter()
                .find_map(|(address, mask)| (*address == target).then(|| *mask))
                .ok_or(MockError::IllegalWriteAddress(target))?;
            if value & !mask != 0 {
                return Err(MockError::IllegalWriteValue(target, *value));
            }
        }
        let mut registers = self.registers.borrow_mut();
        for (offset, value) in payload.iter().enumerate() {
            let target = register.wrapping_add(offset as u8);
            registers[target as usize] = *value;
            self.add_operation(I2cOperation::Write {
                register: target,
                value: *value,
            });
        }
        Ok(())
    }
}

impl i2c::WriteRead for MockGridEye {
    type Error = MockError;

    fn write_read(
        &mut self,
        i2c_address: u8,
        write_buffer: &[u8],
        out_buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        if i2c_address != self.i2c_address {
            return Err(MockError::UnknownI2cAddress(i2c_address));
        }
        // Write-reads should only be writing the register address.
        if write_buffer.len() != 1 || out_buffer.is_empty() {
            return Err(MockError::IllegalOperation);
        }
        let register = write_buffer[0];
        let start = register as usize;
        let end = start + out_buffer.len();
        if end > REGISTER_COUNT {
            return Err(MockError::IllegalOperation);
        }
        self.check_failure(register, out_buffer.len())?;
        self.add_operation(I2cOperation::Read {
            register,
            length: out_buffer.len(),
        });
        out_buffer.copy_from_slice(&self.registers.borrow()[start..end]);
        Ok(())
    }
}

/// A mock sensor whose pixel table holds the given raw frame.
pub fn mock_grideye_with_frame(
    i2c_address: u8,
    pixel_data: &[u8; PIXEL_TABLE_LENGTH],
) -> MockGridEye {
    let mock = MockGridEye::new(i2c_address);
    mock.update_frame(pixel_data);
    mock
}

#[cfg(test)]
mod test {
    use embedded_hal::blocking::i2c::{Write, WriteRead};

    use super::*;

    #[test]
    fn rejects_other_addresses() {
        let mut mock = MockGridEye::new(0x68);
        let mut buf = [0u8; 1];
        assert_eq!(
            mock.write_read(0x69, &[0x80], &mut buf),
            Err(MockError::UnknownI2cAddress(0x69))
        );
        assert_eq!(
            mock.write(0x69, &[0x00, 0x00]),
            Err(MockError::UnknownI2cAddress(0x69))
        );
    }

    #[test]
    fn pixel_table_is_read_only() {
        let mut mock = MockGridEye::new(0x68);
        assert_eq!(
            mock.write(0x68, &[0x80, 0x01]),
            Err(MockError::IllegalWriteAddress(0x80))
        );
    }

    #[test]
    fn reserved_bits_are_protected() {
        let mut mock = MockGridEye::new(0x68);
        assert_eq!(
            mock.write(0x68, &[0x02, 0x02]),
            Err(MockError::IllegalWriteValue(0x02, 0x02))
        );
        assert_eq!(mock.register(0x02), 0x00);
    }

    #[test]
    fn injected_failure() {
        let mut mock = MockGridEye::new(0x68);
        mock.fail_on_register(Some(0x81));
        let mut buf = [0u8; 1];
        assert!(mock.write_read(0x68, &[0x80], &mut buf).is_ok());
        assert_eq!(
            mock.write_read(0x68, &[0x81], &mut buf),
            Err(MockError::Injected(0x81))
        );
        // Multi-byte reads spanning the failing register fail too.
        let mut wide = [0u8; 4];
        assert!(mock.write_read(0x68, &[0x80], &mut wide).is_err());
        mock.fail_on_register(None);
        assert!(mock.write_read(0x68, &[0x81], &mut buf).is_ok());
    }

    #[test]
    fn clones_share_state() {
        let mock = MockGridEye::new(0x68);
        let mut other = mock.clone();
        other.write(0x68, &[0x00, 0x10]).unwrap();
        assert_eq!(mock.register(0x00), 0x10);
        assert_eq!(mock.recent_operations().len(), 1);
    }
}
