// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross

use crate::bus::RegisterBus;
use crate::calculations::{decode_sample, NUM_PIXELS, PIXEL_COEFFICIENT, THERMISTOR_COEFFICIENT};
use crate::error::Error;
use crate::frame::ThermalFrame;
use crate::register::*;

/// Number of bytes in the pixel output table.
const PIXEL_TABLE_LENGTH: usize = NUM_PIXELS * 2;

/// Driver for a Grid-EYE 8×8 thermal array.
///
/// The driver owns the bus and the most recently captured [`ThermalFrame`]. Every operation is
/// blocking, and there is no internal pacing: the sensor refreshes its pixel table at the frame
/// rate set by [`initialize`][GridEye::initialize] (10 FPS), and capturing faster than that will
/// return the same (or a partially refreshed) frame.
#[derive(Clone, Debug)]
pub struct GridEye<B> {
    /// The bus this sensor is accessible on.
    bus: B,

    /// The I²C address this sensor is accessible at.
    address: u8,

    /// The last successfully captured frame.
    frame: ThermalFrame,
}

impl<B> GridEye<B>
where
    B: RegisterBus,
{
    /// Create a `GridEye` for the sensor at the given address.
    ///
    /// No bus traffic happens here, and the frame starts out zeroed. Call
    /// [`initialize`][GridEye::initialize] before capturing.
    pub fn new(bus: B, address: DeviceAddress) -> Self {
        Self {
            bus,
            address: address.into(),
            frame: ThermalFrame::default(),
        }
    }

    /// Configure the sensor for continuous measurement at 10 FPS with the interrupt output
    /// disabled.
    ///
    /// This is three register writes, in order: power control, frame rate, then interrupt
    /// control. The first failure stops the sequence.
    pub fn initialize(&mut self) -> Result<(), Error<B::Error>> {
        let frame_rate = FrameRate::Ten;
        self.write_register(OperatingMode::Normal)?;
        self.write_register(frame_rate)?;
        self.write_register(InterruptControl::default())?;
        debug!(
            "Initialized Grid-EYE at {=u8:#x}, {=f32} FPS",
            self.address,
            f32::from(frame_rate)
        );
        Ok(())
    }

    /// Read a full frame from the sensor and update the stored frame and its extremes.
    ///
    /// Each pixel is read as two single-byte transfers (low then high), starting at
    /// [`RegisterAddress::PixelBase`], for 128 reads in total. All of the raw data is read before
    /// anything is decoded, so if any transfer fails the error is returned and the previously
    /// captured frame is kept as-is.
    pub fn capture_frame(&mut self) -> Result<(), Error<B::Error>> {
        let mut raw = [0u8; PIXEL_TABLE_LENGTH];
        let base: u8 = RegisterAddress::PixelBase.into();
        for (offset, byte) in raw.iter_mut().enumerate() {
            *byte = self.read_raw(base + offset as u8)?;
        }
        let mut temperatures = [0f32; NUM_PIXELS];
        for (temperature, sample) in temperatures.iter_mut().zip(raw.chunks_exact(2)) {
            *temperature = decode_sample(sample[0], sample[1], PIXEL_COEFFICIENT);
        }
        self.frame = ThermalFrame::from_temperatures(temperatures);
        trace!(
            "Captured frame, min {} at {}, max {} at {}",
            self.frame.min_temperature(),
            self.frame.cold_index(),
            self.frame.max_temperature(),
            self.frame.hot_index()
        );
        Ok(())
    }

    /// Read the on-die thermistor, in ℃.
    ///
    /// This is independent of the pixel data, and does not change the stored frame.
    pub fn read_thermistor(&mut self) -> Result<f32, Error<B::Error>> {
        let low = self.read_raw(RegisterAddress::ThermistorLow.into())?;
        let high = self.read_raw(RegisterAddress::ThermistorHigh.into())?;
        Ok(decode_sample(low, high, THERMISTOR_COEFFICIENT))
    }

    /// Read the current operating mode from the sensor.
    pub fn operating_mode(&mut self) -> Result<OperatingMode, Error<B::Error>> {
        self.read_register()
    }

    /// Read the current frame rate from the sensor.
    pub fn frame_rate(&mut self) -> Result<FrameRate, Error<B::Error>> {
        self.read_register()
    }

    /// Read the interrupt settings from the sensor.
    pub fn interrupt_control(&mut self) -> Result<InterruptControl, Error<B::Error>> {
        self.read_register()
    }

    /// The most recently captured frame.
    pub fn frame(&self) -> &ThermalFrame {
        &self.frame
    }

    pub fn temperatures(&self) -> &[f32; NUM_PIXELS] {
        self.frame.temperatures()
    }

    pub fn min_temperature(&self) -> f32 {
        self.frame.min_temperature()
    }

    pub fn max_temperature(&self) -> f32 {
        self.frame.max_temperature()
    }

    pub fn cold_index(&self) -> usize {
        self.frame.cold_index()
    }

    pub fn hot_index(&self) -> usize {
        self.frame.hot_index()
    }

    /// The I²C address of the sensor.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Destroy the driver, returning the bus.
    pub fn release(self) -> B {
        self.bus
    }

    fn read_raw(&mut self, register: u8) -> Result<u8, Error<B::Error>> {
        self.bus
            .read_register(self.address, register)
            .map_err(|err| {
                warn!("Bus error reading register {=u8:#x}", register);
                Error::Bus(err)
            })
    }

    fn read_register<R: Register>(&mut self) -> Result<R, Error<B::Error>> {
        let raw = self.read_raw(R::address().into())?;
        Ok(R::from_raw(raw)?)
    }

    fn write_register<R: Register>(&mut self, register: R) -> Result<(), Error<B::Error>> {
        let address: u8 = R::address().into();
        self.bus
            .write_register(self.address, address, register.as_raw())
            .map_err(|err| {
                warn!("Bus error writing register {=u8:#x}", address);
                Error::Bus(err)
            })
    }
}
