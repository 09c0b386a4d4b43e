// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! A minimal text protocol for streaming frames to a host.
//!
//! The host sends a single command byte, and for [`CAPTURE_COMMAND`] the device captures a frame
//! and answers with one line of text: 64 fixed-width fields, one per pixel in row-major order,
//! with no separators, followed by `"\r\n"`. Each field is exactly [`FIELD_WIDTH`] characters, so
//! a host can split the line by position:
//!
//! ```text
//! 025.75025.50-03.25...\r\n
//! ```
//!
//! This module doesn't do any I/O itself. Feed it the bytes received from whatever serial
//! transport you have, and write the returned lines back out.
use core::fmt::Write;

use arrayvec::ArrayString;

use crate::bus::RegisterBus;
use crate::calculations::NUM_PIXELS;
use crate::driver::GridEye;
use crate::error::{Error, LibraryError};

/// The command byte requesting a frame capture.
pub const CAPTURE_COMMAND: u8 = b'r';

/// The number of characters used for each temperature.
pub const FIELD_WIDTH: usize = 6;

const LINE_TERMINATOR: &str = "\r\n";

/// The length of a full frame line, including the terminator.
pub const LINE_LENGTH: usize = NUM_PIXELS * FIELD_WIDTH + LINE_TERMINATOR.len();

/// One formatted frame.
pub type FrameLine = ArrayString<LINE_LENGTH>;

/// Write a temperature as a six character fixed-point field.
///
/// Non-negative values are written as `DDD.FF`, negative values as `-DD.FF`. Both parts are
/// truncated toward zero, not rounded. Negative zero is written the same as zero. Values that
/// don't fit in six characters (less than or equal to -100, or greater than or equal to 1000) and
/// non-finite values are rejected.
/// ```
/// # use arrayvec::ArrayString;
/// # use grideye::protocol::format_temperature;
/// let mut field = ArrayString::<6>::new();
/// format_temperature(-5.25, &mut field)?;
/// assert_eq!(field.as_str(), "-05.25");
/// # Ok::<(), grideye::LibraryError>(())
/// ```
pub fn format_temperature<W: Write>(value: f32, out: &mut W) -> Result<(), LibraryError> {
    if !value.is_finite() {
        return Err(LibraryError::OutOfRange("Temperature is not a finite number"));
    }
    let negative = value < 0.0;
    let magnitude = if negative { -value } else { value };
    let (sign, integer_width, limit) = if negative {
        ("-", 2usize, 100f32)
    } else {
        ("", 3usize, 1000f32)
    };
    if magnitude >= limit {
        return Err(LibraryError::OutOfRange(
            "Temperature does not fit in a six character field",
        ));
    }
    // `as` truncates toward zero, which is the behavior we want for both parts.
    let whole = magnitude as u16;
    // Rounding in the multiplication can push a fraction just under 1 up to 100.
    let hundredths = (((magnitude - f32::from(whole)) * 100.0) as u16).min(99);
    write!(
        out,
        "{}{:0width$}.{:02}",
        sign,
        whole,
        hundredths,
        width = integer_width
    )
    .map_err(|_| LibraryError::OutOfRange("Output buffer is full"))
}

/// Format a full frame as a single line of text.
pub fn format_frame(temperatures: &[f32; NUM_PIXELS]) -> Result<FrameLine, LibraryError> {
    let mut line = FrameLine::new();
    for temperature in temperatures.iter() {
        format_temperature(*temperature, &mut line)?;
    }
    line.try_push_str(LINE_TERMINATOR)
        .map_err(|_| LibraryError::OutOfRange("Output buffer is full"))?;
    Ok(line)
}

/// Parse a frame line back into temperatures, as a host receiving the line would.
///
/// Fields are split by position, so the line only needs to be at least 64 fields long. Anything
/// after the last field (normally the line terminator) is ignored, as is whitespace around a field.
/// ```
/// # use grideye::protocol::{format_frame, parse_frame};
/// let mut temperatures = [21.5f32; 64];
/// temperatures[9] = -4.25;
/// let line = format_frame(&temperatures)?;
/// assert_eq!(parse_frame(&line)?, temperatures);
/// # Ok::<(), grideye::LibraryError>(())
/// ```
pub fn parse_frame(line: &str) -> Result<[f32; NUM_PIXELS], LibraryError> {
    if line.len() < NUM_PIXELS * FIELD_WIDTH {
        return Err(LibraryError::InvalidData("Frame line is too short"));
    }
    let mut temperatures = [0f32; NUM_PIXELS];
    for (index, temperature) in temperatures.iter_mut().enumerate() {
        let start = index * FIELD_WIDTH;
        let field = line
            .get(start..start + FIELD_WIDTH)
            .ok_or(LibraryError::InvalidData("Frame line is not split on field boundaries"))?;
        let value: f32 = field
            .trim()
            .parse()
            .map_err(|_| LibraryError::InvalidData("Malformed temperature field"))?;
        if !value.is_finite() {
            return Err(LibraryError::InvalidData("Malformed temperature field"));
        }
        *temperature = value;
    }
    Ok(temperatures)
}

/// Handle one command byte from the host.
///
/// For [`CAPTURE_COMMAND`] a frame is captured and returned formatted. Any other byte is ignored,
/// returning `Ok(None)` without touching the bus. If the frame is captured but can't be
/// formatted, the driver still holds the new frame.
pub fn handle_command<B>(
    sensor: &mut GridEye<B>,
    command: u8,
) -> Result<Option<FrameLine>, Error<B::Error>>
where
    B: RegisterBus,
{
    if command != CAPTURE_COMMAND {
        trace!("Ignoring command byte {=u8:#x}", command);
        return Ok(None);
    }
    sensor.capture_frame()?;
    let line = format_frame(sensor.temperatures())?;
    Ok(Some(line))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod test {
    use arrayvec::ArrayString;
    use float_cmp::assert_approx_eq;
    use grideye_test_data::*;

    use super::*;
    use crate::register::DeviceAddress;

    fn field(value: f32) -> Result<ArrayString<FIELD_WIDTH>, LibraryError> {
        let mut out = ArrayString::new();
        format_temperature(value, &mut out)?;
        Ok(out)
    }

    #[test]
    fn positive_fields() {
        assert_eq!(field(25.75).unwrap().as_str(), "025.75");
        assert_eq!(field(0.0).unwrap().as_str(), "000.00");
        assert_eq!(field(0.25).unwrap().as_str(), "000.25");
        assert_eq!(field(511.75).unwrap().as_str(), "511.75");
        assert_eq!(field(999.99).unwrap().as_str().len(), FIELD_WIDTH);
    }

    #[test]
    fn fractions_truncate() {
        // 1/16℃ steps from the thermistor
        assert_eq!(field(0.0625).unwrap().as_str(), "000.06");
        assert_eq!(field(31.0625).unwrap().as_str(), "031.06");
        assert_eq!(field(31.9375).unwrap().as_str(), "031.93");
    }

    #[test]
    fn negative_fields() {
        assert_eq!(field(-5.25).unwrap().as_str(), "-05.25");
        assert_eq!(field(-0.25).unwrap().as_str(), "-00.25");
        assert_eq!(field(-99.75).unwrap().as_str(), "-99.75");
        // Negative zero comes out of the decoder when only the sign bit is set.
        assert_eq!(field(-0.0).unwrap().as_str(), "000.00");
    }

    #[test]
    fn out_of_range_fields() {
        assert!(matches!(field(-100.0), Err(LibraryError::OutOfRange(_))));
        assert!(matches!(field(-511.75), Err(LibraryError::OutOfRange(_))));
        assert!(matches!(field(1000.0), Err(LibraryError::OutOfRange(_))));
        assert!(matches!(field(f32::NAN), Err(LibraryError::OutOfRange(_))));
        assert!(matches!(
            field(f32::NEG_INFINITY),
            Err(LibraryError::OutOfRange(_))
        ));
    }

    #[test]
    fn full_line() {
        let mut temperatures = [0f32; NUM_PIXELS];
        temperatures
            .iter_mut()
            .enumerate()
            .for_each(|(index, temperature)| *temperature = index as f32 * 0.25);
        temperatures[1] = -12.5;
        let line = format_frame(&temperatures).unwrap();
        assert_eq!(line.len(), LINE_LENGTH);
        assert!(line.starts_with("000.00-12.50000.50"));
        assert!(line.ends_with("015.75\r\n"));
        // Every field sits at a fixed offset
        assert_eq!(&line[10 * FIELD_WIDTH..11 * FIELD_WIDTH], "002.50");
    }

    #[test]
    fn line_with_unrepresentable_pixel() {
        let mut temperatures = [20.0f32; NUM_PIXELS];
        temperatures[7] = -200.0;
        assert!(format_frame(&temperatures).is_err());
    }

    #[test]
    fn parse_formatted_line() {
        let mut temperatures = [0f32; NUM_PIXELS];
        temperatures
            .iter_mut()
            .enumerate()
            .for_each(|(index, temperature)| *temperature = index as f32 * 0.25 - 8.0);
        temperatures[20] = 511.75;
        temperatures[21] = -99.75;
        let line = format_frame(&temperatures).unwrap();
        assert_eq!(parse_frame(&line), Ok(temperatures));
        // The terminator is optional
        assert_eq!(
            parse_frame(line.trim_end_matches(LINE_TERMINATOR)),
            Ok(temperatures)
        );
    }

    #[test]
    fn parse_truncates_like_the_formatter() {
        let mut temperatures = [0f32; NUM_PIXELS];
        temperatures[0] = 31.0625;
        let line = format_frame(&temperatures).unwrap();
        let parsed = parse_frame(&line).unwrap();
        assert_approx_eq!(f32, parsed[0], 31.06, epsilon = 0.0001);
    }

    #[test]
    fn parse_padded_fields() {
        let mut line = FrameLine::new();
        for _ in 0..NUM_PIXELS {
            line.push_str("  1.5 ");
        }
        assert_eq!(parse_frame(&line), Ok([1.5f32; NUM_PIXELS]));
    }

    #[test]
    fn parse_short_line() {
        let line = format_frame(&[20.0f32; NUM_PIXELS]).unwrap();
        let short = &line[..NUM_PIXELS * FIELD_WIDTH - 1];
        assert!(matches!(
            parse_frame(short),
            Err(LibraryError::InvalidData(_))
        ));
        assert!(matches!(parse_frame(""), Err(LibraryError::InvalidData(_))));
    }

    #[test]
    fn parse_malformed_fields() {
        let mut line = format_frame(&[20.0f32; NUM_PIXELS]).unwrap();
        line.truncate(FIELD_WIDTH * 10);
        line.push_str("02x.00");
        while line.len() < NUM_PIXELS * FIELD_WIDTH {
            line.push_str("020.00");
        }
        assert!(matches!(
            parse_frame(&line),
            Err(LibraryError::InvalidData(_))
        ));
        let mut not_finite = FrameLine::new();
        for _ in 0..NUM_PIXELS {
            not_finite.push_str("   NaN");
        }
        assert!(parse_frame(&not_finite).is_err());
        // A multi-byte character shifts every field after it off of the field boundaries.
        let mut misaligned = FrameLine::new();
        misaligned.push_str("20.0℃");
        while misaligned.len() < NUM_PIXELS * FIELD_WIDTH {
            misaligned.push_str("020.00");
        }
        assert!(parse_frame(&misaligned).is_err());
    }

    #[test]
    fn other_commands_are_ignored() {
        let mock = mock_grideye_with_frame(DEFAULT_ADDRESS, &ramp_frame());
        let mut sensor = GridEye::new(mock.clone(), DeviceAddress::Primary);
        for command in [b'R', b'x', b'\n', 0x00] {
            assert_eq!(handle_command(&mut sensor, command), Ok(None));
        }
        assert!(mock.recent_operations().is_empty());
    }

    #[test]
    fn capture_command() {
        let mock = mock_grideye_with_frame(DEFAULT_ADDRESS, &ramp_frame());
        let mut sensor = GridEye::new(mock.clone(), DeviceAddress::Primary);
        sensor.initialize().unwrap();
        mock.clear_recent_operations();
        let line = handle_command(&mut sensor, CAPTURE_COMMAND)
            .unwrap()
            .expect("A capture command should produce a line");
        assert_eq!(mock.recent_operations().len(), 128);
        assert!(line.starts_with("000.00000.25000.50"));
        assert!(line.ends_with("015.50015.75\r\n"));
        assert_eq!(sensor.hot_index(), 63);
    }

    #[test]
    fn capture_command_with_unrepresentable_frame() {
        let mock = mock_grideye_with_frame(DEFAULT_ADDRESS, &uniform_frame(0xFF, 0x0F));
        let mut sensor = GridEye::new(mock, DeviceAddress::Primary);
        let res = handle_command(&mut sensor, CAPTURE_COMMAND);
        assert!(matches!(
            res,
            Err(Error::Library(LibraryError::OutOfRange(_)))
        ));
        // The frame was still captured
        assert_eq!(sensor.min_temperature(), -511.75);
    }

    #[test]
    fn capture_command_bus_error() {
        let mock = mock_grideye_with_frame(DEFAULT_ADDRESS, &ramp_frame());
        mock.fail_on_register(Some(PIXEL_BASE));
        let mut sensor = GridEye::new(mock, DeviceAddress::Primary);
        assert_eq!(
            handle_command(&mut sensor, CAPTURE_COMMAND),
            Err(Error::Bus(MockError::Injected(PIXEL_BASE)))
        );
    }
}
