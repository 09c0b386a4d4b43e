// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! Typed views of the Grid-EYE configuration registers.
//!
//! The sensor has a flat 8-bit register map. The registers below 0x80 control and report on the
//! sensor, while 0x80 through 0xFF hold the pixel output table (two bytes per pixel, low byte
//! first). Only the registers this crate writes at startup have typed representations.
use core::convert::TryFrom;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::LibraryError;
use crate::util::{is_bit_set, with_bit};

/// Trait for common register functionality.
pub trait Register: Sized {
    /// The offset of this register in the sensor's register map.
    fn address() -> RegisterAddress;

    /// Parse the raw register value.
    fn from_raw(raw: u8) -> Result<Self, LibraryError>;

    /// The raw value to write to the register.
    fn as_raw(&self) -> u8;
}

/// Register offsets used by this crate.
// NOTE: To make it easier to compare against the datasheet, discriminant values should *always* be
// explicitly written out.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RegisterAddress {
    /// Power control (PCTL), selects the operating mode.
    PowerControl = 0x00,

    /// Frame rate (FPSC).
    FrameRate = 0x02,

    /// Interrupt control (INTC).
    InterruptControl = 0x03,

    /// Thermistor output, lower 8 bits (TTHL).
    ThermistorLow = 0x0E,

    /// Thermistor output, upper 4 bits (TTHH). Bit 3 is the sign.
    ThermistorHigh = 0x0F,

    /// The low byte of the first pixel (T01L). The rest of the pixel table follows contiguously.
    PixelBase = 0x80,
}

/// The I²C address of the sensor, selected by the level of the AD_SELECT pin.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DeviceAddress {
    /// AD_SELECT tied low. Some datasheets write this as `0xD0`, the address shifted left one bit.
    Primary = 0x68,

    /// AD_SELECT tied high.
    Alternate = 0x69,
}

impl Default for DeviceAddress {
    fn default() -> Self {
        Self::Primary
    }
}

/// The possible operating modes, as set in the power control register.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OperatingMode {
    /// Continuous measurement, the default.
    Normal = 0x00,

    Sleep = 0x10,

    /// Wake up and measure once every 60 seconds.
    StandbySixtySeconds = 0x20,

    /// Wake up and measure once every 10 seconds.
    StandbyTenSeconds = 0x21,
}

impl Default for OperatingMode {
    fn default() -> Self {
        Self::Normal
    }
}

impl Register for OperatingMode {
    fn address() -> RegisterAddress {
        RegisterAddress::PowerControl
    }

    fn from_raw(raw: u8) -> Result<Self, LibraryError> {
        Self::try_from(raw).map_err(|_| LibraryError::InvalidData("Invalid operating mode"))
    }

    fn as_raw(&self) -> u8 {
        (*self).into()
    }
}

/// The frame rates the sensor supports.
///
/// The pixel table is refreshed at this rate regardless of how often it is read.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameRate {
    /// 10 Hz, the default.
    Ten,

    /// 1 Hz.
    One,
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::Ten
    }
}

impl Register for FrameRate {
    fn address() -> RegisterAddress {
        RegisterAddress::FrameRate
    }

    fn from_raw(raw: u8) -> Result<Self, LibraryError> {
        // Only bit 0 is defined, the rest are reserved.
        Ok(if is_bit_set(raw, 0) {
            Self::One
        } else {
            Self::Ten
        })
    }

    fn as_raw(&self) -> u8 {
        match self {
            Self::Ten => 0x00,
            Self::One => 0x01,
        }
    }
}

impl From<FrameRate> for f32 {
    fn from(frame_rate: FrameRate) -> Self {
        match frame_rate {
            FrameRate::Ten => 10f32,
            FrameRate::One => 1f32,
        }
    }
}

/// The interrupt control register.
///
/// The interrupt output is not used by this crate, so it is disabled at startup.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptControl {
    /// Whether the INT pin is driven (INTEN, bit 0).
    pub(crate) enabled: bool,

    /// Compare pixels against absolute levels instead of the difference from the previous frame
    /// (INTMOD, bit 1).
    pub(crate) absolute_mode: bool,
}

impl InterruptControl {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn absolute_mode(&self) -> bool {
        self.absolute_mode
    }
}

impl Register for InterruptControl {
    fn address() -> RegisterAddress {
        RegisterAddress::InterruptControl
    }

    fn from_raw(raw: u8) -> Result<Self, LibraryError> {
        Ok(Self {
            enabled: is_bit_set(raw, 0),
            absolute_mode: is_bit_set(raw, 1),
        })
    }

    fn as_raw(&self) -> u8 {
        let raw = with_bit(0u8, 0, self.enabled);
        with_bit(raw, 1, self.absolute_mode)
    }
}
