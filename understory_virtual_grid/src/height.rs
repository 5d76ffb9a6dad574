// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retention of the last known-good item height.

/// Measurements at or below this many units are treated as transient.
///
/// Hosts commonly report `0` or `1` while the reference item is mounting or
/// unmounting; feeding those into the row math would collapse the grid.
pub const DEGENERATE_HEIGHT: f64 = 1.0;

/// Tracks the measured height of a single grid row.
///
/// The tracker starts out empty. The first measurement above
/// [`DEGENERATE_HEIGHT`] is retained, and later degenerate measurements are
/// ignored so the previous good value stays in effect.
///
/// ```rust
/// use understory_virtual_grid::HeightTracker;
///
/// let mut tracker = HeightTracker::new();
/// assert_eq!(tracker.observe(0.0), None);
/// assert_eq!(tracker.observe(50.0), Some(50.0));
/// assert_eq!(tracker.observe(1.0), Some(50.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeightTracker {
    retained: Option<f64>,
}

impl HeightTracker {
    /// Creates a tracker with no retained height.
    #[must_use]
    pub const fn new() -> Self {
        Self { retained: None }
    }

    /// Feeds a new measurement and returns the height now in effect.
    pub fn observe(&mut self, candidate: f64) -> Option<f64> {
        if candidate.is_finite() && candidate > DEGENERATE_HEIGHT {
            self.retained = Some(candidate);
        }
        self.retained
    }

    /// Returns the retained height, if one has been observed.
    #[must_use]
    pub const fn get(&self) -> Option<f64> {
        self.retained
    }

    /// Forgets the retained height.
    pub fn reset(&mut self) {
        self.retained = None;
    }
}
