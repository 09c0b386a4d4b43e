// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
#[cfg(feature = "std")]
extern crate std;

use core::fmt;

/// Errors that don't involve the register bus.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LibraryError {
    /// When a value from the sensor is malformed in some way.
    InvalidData(&'static str),

    /// A value can't be represented in the requested output format.
    OutOfRange(&'static str),
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::InvalidData(msg) => write!(f, "{}", msg),
            LibraryError::OutOfRange(msg) => write!(f, "{}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LibraryError {}

/// Errors from the driver, generic over the error type of the [register bus][crate::RegisterBus].
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A register transfer failed.
    ///
    /// When this is returned from [`capture_frame`][crate::GridEye::capture_frame], the previous
    /// frame is left untouched.
    Bus(E),

    /// Errors originating from within this library.
    Library(LibraryError),
}

// Custom Debug implementation so the output matches the Display prefixes, and only requires the
// bus error to be Debug.
impl<E> fmt::Debug for Error<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(bus_error) => f.debug_tuple("Error::Bus").field(bus_error).finish(),
            Error::Library(err) => f.debug_tuple("Error::Library").field(err).finish(),
        }
    }
}

impl<E> fmt::Display for Error<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(bus_error) => write!(f, "Bus Error: {:?}", bus_error),
            Error::Library(err) => write!(f, "Library Error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<E> std::error::Error for Error<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Bus(bus_error) => Some(bus_error),
            Error::Library(lib_err) => Some(lib_err),
        }
    }
}

impl<E> From<LibraryError> for Error<E> {
    fn from(lib_err: LibraryError) -> Self {
        Self::Library(lib_err)
    }
}
