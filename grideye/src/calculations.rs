// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! Conversions from raw register values to temperatures.
//!
//! Both the pixels and the thermistor report a 12-bit sign-magnitude value split across two
//! registers. The low register holds the lower 8 bits of the magnitude, the lowest 3 bits of the
//! high register hold the upper 3 bits of the magnitude, and any of the remaining bits of the high
//! register mark the value as negative. This is *not* two's complement: `0x08FF` is -255 LSB, not
//! -1793. The two readings only differ in the size of one LSB.

use crate::error::LibraryError;

/// Width of the pixel array.
pub const WIDTH: usize = 8;

/// Height of the pixel array.
pub const HEIGHT: usize = 8;

/// Number of pixels in a frame.
pub const NUM_PIXELS: usize = WIDTH * HEIGHT;

/// ℃ per LSB for the pixel outputs.
pub const PIXEL_COEFFICIENT: f32 = 0.25;

/// ℃ per LSB for the thermistor output.
pub const THERMISTOR_COEFFICIENT: f32 = 0.0625;

/// Mask for the magnitude bits in the high register.
const HIGH_MAGNITUDE_MASK: u8 = 0x07;

/// Convert a raw register pair into a temperature.
///
/// The magnitude is the low 3 bits of `raw_high` above the 8 bits of `raw_low`, scaled by
/// `coefficient`. If any of bits 3 through 7 of `raw_high` are set the result is negated, so a
/// negative zero is possible.
/// ```
/// # use grideye::calculations::{decode_sample, PIXEL_COEFFICIENT};
/// assert_eq!(decode_sample(0x64, 0x00, PIXEL_COEFFICIENT), 25.0);
/// assert_eq!(decode_sample(0x64, 0x08, PIXEL_COEFFICIENT), -25.0);
/// ```
pub fn decode_sample(raw_low: u8, raw_high: u8, coefficient: f32) -> f32 {
    let magnitude = (u16::from(raw_high & HIGH_MAGNITUDE_MASK) << 8) | u16::from(raw_low);
    let temperature = f32::from(magnitude) * coefficient;
    if raw_high >> 3 != 0 {
        -temperature
    } else {
        temperature
    }
}

/// The coldest and hottest pixels in a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Extremes {
    pub min_temperature: f32,
    pub max_temperature: f32,
    pub cold_index: usize,
    pub hot_index: usize,
}

/// Find the minimum and maximum temperatures in a single pass.
///
/// Updates only happen on a strict inequality, so when the extreme value occurs more than once the
/// first occurrence (lowest index) is the one reported.
pub fn find_extremes(temperatures: &[f32; NUM_PIXELS]) -> Extremes {
    // Every decodable value is finite, so the first pixel always replaces both sentinels.
    let mut extremes = Extremes {
        min_temperature: f32::INFINITY,
        max_temperature: f32::NEG_INFINITY,
        cold_index: 0,
        hot_index: 0,
    };
    for (index, temperature) in temperatures.iter().copied().enumerate() {
        if temperature < extremes.min_temperature {
            extremes.min_temperature = temperature;
            extremes.cold_index = index;
        }
        if temperature > extremes.max_temperature {
            extremes.max_temperature = temperature;
            extremes.hot_index = index;
        }
    }
    extremes
}

/// Find the source cell an output position falls in, and how far across that cell it is.
///
/// The first and last output positions line up with the first and last source pixels. The last
/// position is kept in the last cell (instead of starting a new one past the edge) with an offset
/// of 1.
fn source_cell(position: usize, output_length: usize, source_length: usize) -> (usize, f32) {
    let scaled = if output_length > 1 {
        position as f32 / (output_length - 1) as f32 * (source_length - 1) as f32
    } else {
        0f32
    };
    let cell = (scaled as usize).min(source_length - 2);
    (cell, scaled - cell as f32)
}

/// Upscale a frame by an integer factor using bilinear interpolation.
///
/// `output` is filled in row-major order, and must hold exactly `(8 × scale)²` values. The corners
/// of the output are the corners of the source frame, and every other value is blended from the
/// four source pixels surrounding it.
pub fn interpolate(
    temperatures: &[f32; NUM_PIXELS],
    scale: usize,
    output: &mut [f32],
) -> Result<(), LibraryError> {
    if scale == 0 {
        return Err(LibraryError::OutOfRange("Interpolation scale must be at least 1"));
    }
    let (output_width, output_height) = WIDTH
        .checked_mul(scale)
        .zip(HEIGHT.checked_mul(scale))
        .ok_or(LibraryError::OutOfRange("Interpolation scale is too large"))?;
    if output_width.checked_mul(output_height) != Some(output.len()) {
        return Err(LibraryError::OutOfRange(
            "Interpolation output is the wrong size for the scale",
        ));
    }
    for (output_row, row) in output.chunks_exact_mut(output_width).enumerate() {
        let (source_row, row_offset) = source_cell(output_row, output_height, HEIGHT);
        for (output_column, value) in row.iter_mut().enumerate() {
            let (source_column, column_offset) =
                source_cell(output_column, output_width, WIDTH);
            let top_left = source_row * WIDTH + source_column;
            let bottom_left = top_left + WIDTH;
            let top = temperatures[top_left] * (1.0 - column_offset)
                + temperatures[top_left + 1] * column_offset;
            let bottom = temperatures[bottom_left] * (1.0 - column_offset)
                + temperatures[bottom_left + 1] * column_offset;
            *value = top * (1.0 - row_offset) + bottom * row_offset;
        }
    }
    Ok(())
}
