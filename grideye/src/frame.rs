// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
use crate::calculations::{find_extremes, Extremes, HEIGHT, NUM_PIXELS, WIDTH};

/// One complete 8×8 snapshot of temperatures, along with its coldest and hottest pixels.
///
/// Pixels are stored in row-major order, with the X-axis increasing from left to right and the
/// Y-axis increasing from top to bottom (as seen from the sensor).
#[derive(Clone, Debug, PartialEq)]
pub struct ThermalFrame {
    temperatures: [f32; NUM_PIXELS],
    min_temperature: f32,
    max_temperature: f32,
    cold_index: usize,
    hot_index: usize,
}

impl ThermalFrame {
    /// Build a frame from a full set of temperatures, computing the extremes.
    pub fn from_temperatures(temperatures: [f32; NUM_PIXELS]) -> Self {
        let Extremes {
            min_temperature,
            max_temperature,
            cold_index,
            hot_index,
        } = find_extremes(&temperatures);
        Self {
            temperatures,
            min_temperature,
            max_temperature,
            cold_index,
            hot_index,
        }
    }

    /// All of the pixel temperatures, in ℃.
    pub fn temperatures(&self) -> &[f32; NUM_PIXELS] {
        &self.temperatures
    }

    pub fn min_temperature(&self) -> f32 {
        self.min_temperature
    }

    pub fn max_temperature(&self) -> f32 {
        self.max_temperature
    }

    /// The index of the first pixel with the minimum temperature.
    pub fn cold_index(&self) -> usize {
        self.cold_index
    }

    /// The index of the first pixel with the maximum temperature.
    pub fn hot_index(&self) -> usize {
        self.hot_index
    }

    /// The temperature of the pixel at the given position, or `None` if it's outside of the grid.
    pub fn pixel(&self, row: usize, column: usize) -> Option<f32> {
        if row >= HEIGHT || column >= WIDTH {
            None
        } else {
            Some(self.temperatures[row * WIDTH + column])
        }
    }

    /// Convert a pixel index into a `(row, column)` pair, or `None` if the index is past the last
    /// pixel.
    pub fn coordinates(index: usize) -> Option<(usize, usize)> {
        if index < NUM_PIXELS {
            Some((index / WIDTH, index % WIDTH))
        } else {
            None
        }
    }
}

impl Default for ThermalFrame {
    /// Everything zeroed, which is what the driver reports before the first capture.
    fn default() -> Self {
        Self {
            temperatures: [0f32; NUM_PIXELS],
            min_temperature: 0f32,
            max_temperature: 0f32,
            cold_index: 0,
            hot_index: 0,
        }
    }
}
