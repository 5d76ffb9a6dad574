// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row arithmetic helpers that do not depend on `std` float intrinsics.

/// Returns `floor(value)` as a row count, treating negative and NaN values as `0`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Float-to-int casts saturate, and positive values truncate towards zero."
)]
#[inline]
pub(crate) fn floor_rows(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    value as usize
}

/// Returns `ceil(value)` as a row count, treating negative and NaN values as `0`.
#[inline]
pub(crate) fn ceil_rows(value: f64) -> usize {
    let rows = floor_rows(value);
    if to_f64(rows) < value {
        rows.saturating_add(1)
    } else {
        rows
    }
}

/// Converts an index or count into the float coordinate space.
#[inline]
pub(crate) fn to_f64(value: usize) -> f64 {
    value as f64
}
