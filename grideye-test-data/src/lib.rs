// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
mod frame_data;
mod i2c_mock;

pub use frame_data::{ramp_frame, uniform_frame, DEFAULT_ADDRESS};
pub use i2c_mock::{
    mock_grideye_with_frame, I2cOperation, MockError, MockGridEye, PIXEL_BASE,
    PIXEL_TABLE_LENGTH, REGISTER_COUNT,
};
