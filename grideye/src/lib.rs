// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! A pure-Rust library for reading Grid-EYE (AMG88xx) 8×8 thermal array sensors.
//!
//! Compared to the larger thermopile cameras, the Grid-EYE does almost all of the work itself:
//! each pixel is reported as a calibrated temperature in a pair of registers. What's left for the
//! controller is decoding those register pairs (which use a sign-magnitude encoding, *not* two's
//! complement), assembling the 64 pixels into a frame, and finding the hot and cold spots.
//!
//! This library talks to the sensor through [`RegisterBus`], which is implemented for every
//! [`embedded-hal`][embedded-hal] I²C bus, meaning you should be able to use this library on any
//! platform with an `embedded-hal` I²C implementation available. It is also `no_std` compatible,
//! and doesn't allocate.
//!
//! [embedded-hal]: https://docs.rs/embedded-hal/*/embedded_hal/blocking/i2c/index.html
//!
//! # Example
//! ```no_run
//! use grideye::{DeviceAddress, GridEye};
//! use linux_embedded_hal::I2cdev;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let i2c_bus = I2cdev::new("/dev/i2c-1").expect("/dev/i2c-1 needs to be an I2C controller");
//! // The address depends on the AD_SELECT pin, low is the primary address (0x68).
//! let mut sensor = GridEye::new(i2c_bus, DeviceAddress::Primary);
//! sensor.initialize()?;
//! sensor.capture_frame()?;
//! println!(
//!     "Hottest pixel is #{} at {}℃",
//!     sensor.hot_index(),
//!     sensor.max_temperature()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Displaying frames
//! The [`protocol`] module formats frames as text lines for a host, and parses them back on the
//! other end. Hosts can then upscale a frame with [`calculations::interpolate`] and color it with
//! [`color::ColorScheme`].
//!
//! # Errors
//! Any failed bus transfer is returned as [`Error::Bus`]. When that happens during
//! [`capture_frame`][GridEye::capture_frame], the previously captured frame is kept, so the
//! accessors never expose a mix of old and new pixels.
//!
//! # Logging
//! Enable the `defmt` feature to log through [`defmt`](https://docs.rs/defmt). Without it, no
//! logging code is compiled in.

#![no_std]

#[macro_use]
mod fmt;

mod bus;
pub mod calculations;
pub mod color;
#[doc(hidden)]
pub mod driver;
#[doc(hidden)]
pub mod error;
mod frame;
pub mod protocol;
pub mod register;
mod util;

pub use bus::RegisterBus;
#[doc(inline)]
pub use driver::GridEye;
#[doc(inline)]
pub use error::{Error, LibraryError};
pub use frame::ThermalFrame;
pub use register::{DeviceAddress, FrameRate, InterruptControl, OperatingMode, RegisterAddress};
