// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross

/// Check if the n-th bit is set.
///
/// Bits are 0-indexed, from the LSB.
pub(crate) fn is_bit_set<B>(value: B, index: usize) -> bool
where
    B: num_traits::PrimInt + num_traits::Unsigned,
{
    (value & (B::one() << index)) > B::zero()
}

/// Set or clear the n-th bit, returning the new value.
pub(crate) fn with_bit<B>(value: B, index: usize, set: bool) -> B
where
    B: num_traits::PrimInt + num_traits::Unsigned,
{
    let mask = B::one() << index;
    if set {
        value | mask
    } else {
        value & !mask
    }
}
