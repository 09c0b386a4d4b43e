// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! Raw pixel tables for tests and benchmarks.
//!
//! Each table is laid out the way the sensor presents it starting at register 0x80: 64 pixels,
//! each a low byte followed by a high byte.
use arrayvec::ArrayVec;

use crate::PIXEL_TABLE_LENGTH;

/// The default I²C address of the sensor (AD_SELECT pulled low).
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Pixel `i` has a low byte of `i` and a high byte of 0, so it decodes to `i * 0.25` ℃.
pub fn ramp_frame() -> [u8; PIXEL_TABLE_LENGTH] {
    let bytes: ArrayVec<u8, PIXEL_TABLE_LENGTH> =
        (0u8..64).flat_map(|index| [index, 0x00]).collect();
    // Exactly 128 bytes were collected above.
    bytes.into_inner().unwrap()
}

/// Every pixel has the same raw value.
pub fn uniform_frame(low: u8, high: u8) -> [u8; PIXEL_TABLE_LENGTH] {
    let mut frame = [0u8; PIXEL_TABLE_LENGTH];
    frame.chunks_exact_mut(2).for_each(|pixel| {
        pixel[0] = low;
        pixel[1] = high;
    });
    frame
}

#[cfg(test)]
mod test {
    #[test]
    fn ramp_layout() {
        let frame = super::ramp_frame();
        assert_eq!(&frame[..6], &[0, 0, 1, 0, 2, 0]);
        assert_eq!(&frame[126..], &[63, 0]);
    }

    #[test]
    fn uniform_layout() {
        let frame = super::uniform_frame(0x64, 0x08);
        assert!(frame.chunks_exact(2).all(|pixel| pixel == [0x64, 0x08]));
    }
}
