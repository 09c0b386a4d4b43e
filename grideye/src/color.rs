// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! Mapping temperatures to display colors.
//!
//! A color scheme is a fixed set of evenly spaced color stops. The display range (usually the
//! frame's extremes, widened by [`RANGE_PADDING`] on each side) is divided evenly between the
//! stops, and temperatures in between two stops are blended linearly.
use crate::frame::ThermalFrame;

/// An 8-bit per channel color.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// The number of color stops in every scheme.
pub const NUM_STOPS: usize = 11;

/// How far (in ℃) the display range extends past the coldest and hottest pixels.
pub const RANGE_PADDING: f32 = 0.5;

const RAINBOW_STOPS: [Rgb; NUM_STOPS] = [
    Rgb::new(28, 1, 108),
    Rgb::new(31, 17, 218),
    Rgb::new(50, 111, 238),
    Rgb::new(63, 196, 229),
    Rgb::new(64, 222, 135),
    Rgb::new(192, 240, 14),
    Rgb::new(223, 172, 18),
    Rgb::new(209, 111, 14),
    Rgb::new(210, 50, 28),
    Rgb::new(194, 26, 0),
    Rgb::new(132, 26, 0),
];

const IRON_STOPS: [Rgb; NUM_STOPS] = [
    Rgb::new(0, 0, 5),
    Rgb::new(7, 1, 97),
    Rgb::new(51, 1, 194),
    Rgb::new(110, 2, 212),
    Rgb::new(158, 6, 150),
    Rgb::new(197, 30, 58),
    Rgb::new(218, 66, 0),
    Rgb::new(237, 137, 0),
    Rgb::new(246, 199, 23),
    Rgb::new(251, 248, 117),
    Rgb::new(252, 254, 253),
];

/// The available color schemes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorScheme {
    /// Dark blue through green and yellow to dark red.
    Rainbow,

    /// Black through purple and orange to white.
    Iron,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::Rainbow
    }
}

impl ColorScheme {
    /// The color stops, from coldest to hottest.
    pub fn stops(&self) -> &'static [Rgb; NUM_STOPS] {
        match self {
            Self::Rainbow => &RAINBOW_STOPS,
            Self::Iron => &IRON_STOPS,
        }
    }

    /// The color for `temperature` when `min` and `max` are the ends of the display range.
    ///
    /// Temperatures below `min` (and NaN) get the first stop, and temperatures at or above `max`
    /// get the last stop. Channels are blended linearly and truncated.
    pub fn color(&self, temperature: f32, min: f32, max: f32) -> Rgb {
        let stops = self.stops();
        if temperature.is_nan() || temperature < min {
            return stops[0];
        }
        if temperature >= max {
            return stops[NUM_STOPS - 1];
        }
        let step = (max - min) / (NUM_STOPS - 1) as f32;
        // Rounding can put a temperature just under max into the (nonexistent) stop after the last.
        let lower = (((temperature - min) / step) as usize).min(NUM_STOPS - 2);
        let fraction = (temperature - (min + lower as f32 * step)) / step;
        let (from, to) = (stops[lower], stops[lower + 1]);
        Rgb {
            red: blend(from.red, to.red, fraction),
            green: blend(from.green, to.green, fraction),
            blue: blend(from.blue, to.blue, fraction),
        }
    }
}

fn blend(from: u8, to: u8, fraction: f32) -> u8 {
    // `as` saturates, so a fraction slightly outside of 0..1 stays in range.
    (f32::from(from) + fraction * (f32::from(to) - f32::from(from))) as u8
}

/// The display range for a frame: its extremes, widened by [`RANGE_PADDING`] on each side.
///
/// The padding keeps a uniform frame from collapsing the range to a single point.
pub fn display_range(frame: &ThermalFrame) -> (f32, f32) {
    (
        frame.min_temperature() - RANGE_PADDING,
        frame.max_temperature() + RANGE_PADDING,
    )
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod test {
    use super::*;
    use crate::calculations::NUM_PIXELS;

    #[test]
    fn outside_of_range() {
        let scheme = ColorScheme::Rainbow;
        assert_eq!(scheme.color(-5.0, 0.0, 10.0), Rgb::new(28, 1, 108));
        assert_eq!(scheme.color(10.0, 0.0, 10.0), Rgb::new(132, 26, 0));
        assert_eq!(scheme.color(100.0, 0.0, 10.0), Rgb::new(132, 26, 0));
        assert_eq!(scheme.color(f32::NAN, 0.0, 10.0), Rgb::new(28, 1, 108));
    }

    #[test]
    fn exact_stops() {
        for scheme in [ColorScheme::Rainbow, ColorScheme::Iron] {
            // Ten degrees across ten steps puts a stop on every whole degree.
            for (index, stop) in scheme.stops()[..NUM_STOPS - 1].iter().enumerate() {
                assert_eq!(scheme.color(index as f32, 0.0, 10.0), *stop);
            }
        }
    }

    #[test]
    fn blends_between_stops() {
        let scheme = ColorScheme::Rainbow;
        // Halfway between (28, 1, 108) and (31, 17, 218), truncated
        assert_eq!(scheme.color(0.5, 0.0, 10.0), Rgb::new(29, 9, 163));
        // A quarter of the way from (194, 26, 0) to (132, 26, 0)
        assert_eq!(scheme.color(9.25, 0.0, 10.0), Rgb::new(178, 26, 0));
    }

    #[test]
    fn just_under_max() {
        for (min, max) in [(0.0f32, 1.0f32), (-3.7, 12.9), (20.0, 20.5), (-511.75, 511.75)] {
            let below_max = f32::from_bits(max.to_bits() - 1);
            // Shouldn't panic, and should be very close to the last stop
            let color = ColorScheme::Iron.color(below_max, min, max);
            assert!(color.red >= 251);
        }
    }

    #[test]
    fn padded_range() {
        let mut temperatures = [20.0f32; NUM_PIXELS];
        temperatures[4] = 31.5;
        temperatures[60] = 18.25;
        let frame = ThermalFrame::from_temperatures(temperatures);
        assert_eq!(display_range(&frame), (17.75, 32.0));
        // A uniform frame still has a usable range
        let uniform = ThermalFrame::from_temperatures([22.0f32; NUM_PIXELS]);
        let (min, max) = display_range(&uniform);
        assert_eq!((min, max), (21.5, 22.5));
        assert_eq!(
            ColorScheme::default().color(22.0, min, max),
            ColorScheme::Rainbow.stops()[5]
        );
    }
}
