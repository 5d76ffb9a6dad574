// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window computation: which item indices to realize for a scroll position.

use core::cmp;
use core::num::NonZeroUsize;
use core::ops::Range;

use kurbo::Size;

use crate::util::{ceil_rows, floor_rows};

/// The contiguous range of item indices to realize, `[offset, offset + visible)`.
///
/// The range may extend past the end of the item list; use
/// [`WindowState::range`] to clamp it when slicing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowState {
    /// Index of the first realized item.
    pub offset: usize,
    /// Number of realized items, before clamping to the list length.
    pub visible: usize,
}

impl WindowState {
    /// Creates a window starting at `offset` covering `visible` items.
    #[must_use]
    pub const fn new(offset: usize, visible: usize) -> Self {
        Self { offset, visible }
    }

    /// Returns the window intersected with `0..len`.
    #[must_use]
    pub fn range(&self, len: usize) -> Range<usize> {
        let end = self.offset.saturating_add(self.visible).min(len);
        let start = self.offset.min(end);
        start..end
    }
}

/// The part of the realized window that is actually on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    /// Index of the first item whose row is at least partially in view.
    pub first_visible_index: Option<usize>,
    /// One past the last on-screen index, clamped to the list length.
    pub last_visible_index: Option<usize>,
}

impl VisibilityReport {
    /// Report used while geometry or row height is unknown.
    pub const UNKNOWN: Self = Self {
        first_visible_index: None,
        last_visible_index: None,
    };

    /// Returns `true` if both bounds are known.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.first_visible_index.is_some() && self.last_visible_index.is_some()
    }
}

/// Measured size of the grid container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportGeometry {
    /// Container size, `None` until measured.
    pub container: Option<Size>,
}

impl ViewportGeometry {
    /// Geometry that has not been measured yet.
    pub const UNMEASURED: Self = Self { container: None };

    /// Geometry from a container measurement.
    ///
    /// Empty, negative, or non-finite sizes count as unmeasured.
    #[must_use]
    pub fn from_container(size: Size) -> Self {
        let usable = size.is_finite() && size.width > 0.0 && size.height > 0.0;
        Self {
            container: usable.then_some(size),
        }
    }

    /// Returns `true` once both container dimensions are known.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.container.is_some()
    }
}

/// The host's scroll position and visible area.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    /// Page scroll offset from the top.
    pub scroll_top: f64,
    /// Height of the visible area.
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport scrolled to `scroll_top` showing `height` units.
    #[must_use]
    pub const fn new(scroll_top: f64, height: f64) -> Self {
        Self { scroll_top, height }
    }
}

/// Inputs to [`compute_window`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowInput {
    /// Measured container size.
    pub geometry: ViewportGeometry,
    /// Retained row height.
    pub item_height: Option<f64>,
    /// Scroll position and visible height.
    pub viewport: Viewport,
    /// Offset of the container's top edge from the top of the page, `None` if
    /// the container is not mounted.
    pub container_offset: Option<f64>,
    /// Column count.
    pub columns: NonZeroUsize,
    /// Extra rows realized on each side of the visible rows.
    pub overscan_rows: usize,
    /// Total number of items.
    pub len: usize,
}

/// Result of [`compute_window`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridWindow {
    /// Indices to realize.
    pub state: WindowState,
    /// On-screen subset of [`GridWindow::state`].
    pub report: VisibilityReport,
}

/// Computes the realized window and the on-screen range for a scroll position.
///
/// When the row height, the container size, or the container offset is
/// unknown, `fallback` is returned unchanged together with
/// [`VisibilityReport::UNKNOWN`].
///
/// Otherwise rows are counted from the container's top edge relative to the
/// viewport, `top = container_offset - scroll_top`:
///
/// - the first visible row is the number of whole rows scrolled above the
///   viewport, `floor(max(-top, 0) / item_height)`;
/// - up to `overscan_rows` rows before it are realized as well, as far as
///   there are rows to take;
/// - the rows in view cover the viewport below the container's top edge,
///   `ceil((viewport.height - max(top, 0)) / item_height)`;
/// - `overscan_rows` more rows are realized after them.
///
/// The window is not clamped to `len`; only `last_visible_index` is.
///
/// ```rust
/// use core::num::NonZeroUsize;
/// use kurbo::Size;
/// use understory_virtual_grid::{
///     Viewport, ViewportGeometry, WindowInput, WindowState, compute_window,
/// };
///
/// let input = WindowInput {
///     geometry: ViewportGeometry::from_container(Size::new(1000.0, 30000.0)),
///     item_height: Some(200.0),
///     viewport: Viewport::new(2000.0, 800.0),
///     container_offset: Some(0.0),
///     columns: NonZeroUsize::new(4).unwrap(),
///     overscan_rows: 3,
///     len: 600,
/// };
/// let window = compute_window(&input, WindowState::new(0, 16));
/// assert_eq!(window.state, WindowState::new(28, 40));
/// assert_eq!(window.report.first_visible_index, Some(40));
/// assert_eq!(window.report.last_visible_index, Some(56));
/// ```
#[must_use]
pub fn compute_window(input: &WindowInput, fallback: WindowState) -> GridWindow {
    let unknown = GridWindow {
        state: fallback,
        report: VisibilityReport::UNKNOWN,
    };
    let Some(item_height) = input.item_height.filter(|h| h.is_finite() && *h > 0.0) else {
        return unknown;
    };
    if !input.geometry.is_known() {
        return unknown;
    }
    let Some(container_offset) = input.container_offset else {
        return unknown;
    };

    let columns = input.columns.get();
    let top = container_offset - input.viewport.scroll_top;

    let first_visible_row = floor_rows((-top).max(0.0) / item_height);
    let overscan_before = cmp::min(input.overscan_rows, first_visible_row);
    let offset_rows = first_visible_row - overscan_before;

    let rows_in_view = ceil_rows((input.viewport.height - top.max(0.0)) / item_height);
    let rows_to_render = rows_in_view
        .saturating_add(overscan_before)
        .saturating_add(input.overscan_rows);

    let first_visible_index = first_visible_row.saturating_mul(columns);
    let last_visible_index = cmp::min(
        first_visible_index.saturating_add(rows_in_view.saturating_mul(columns)),
        input.len,
    );

    GridWindow {
        state: WindowState {
            offset: offset_rows.saturating_mul(columns),
            visible: rows_to_render.saturating_mul(columns),
        },
        report: VisibilityReport {
            first_visible_index: Some(first_visible_index),
            last_visible_index: Some(last_visible_index),
        },
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroUsize;

    use kurbo::Size;

    use super::{
        GridWindow, Viewport, ViewportGeometry, VisibilityReport, WindowInput, WindowState,
        compute_window,
    };

    fn input(scroll_top: f64) -> WindowInput {
        WindowInput {
            geometry: ViewportGeometry::from_container(Size::new(1200.0, 30000.0)),
            item_height: Some(200.0),
            viewport: Viewport::new(scroll_top, 800.0),
            container_offset: Some(0.0),
            columns: NonZeroUsize::new(4).unwrap(),
            overscan_rows: 3,
            len: 600,
        }
    }

    #[test]
    fn scrolled_to_row_ten() {
        let window = compute_window(&input(2000.0), WindowState::new(0, 16));
        assert_eq!(
            window,
            GridWindow {
                state: WindowState::new(28, 40),
                report: VisibilityReport {
                    first_visible_index: Some(40),
                    last_visible_index: Some(56),
                },
            }
        );
    }

    #[test]
    fn overscan_before_is_limited_by_available_rows() {
        // Row 1 is first visible; only one row exists above it.
        let window = compute_window(&input(250.0), WindowState::default());
        assert_eq!(window.state.offset, 0);
        // ceil(800 / 200) = 4 rows in view, plus 1 before and 3 after.
        assert_eq!(window.state.visible, 8 * 4);
        assert_eq!(window.report.first_visible_index, Some(4));
    }

    #[test]
    fn at_top_only_trailing_overscan_applies() {
        let window = compute_window(&input(0.0), WindowState::default());
        assert_eq!(window.state, WindowState::new(0, 7 * 4));
        assert_eq!(window.report.first_visible_index, Some(0));
        assert_eq!(window.report.last_visible_index, Some(16));
    }

    #[test]
    fn container_below_the_fold_shrinks_rows_in_view() {
        // Container starts 500 units down the page; 300 units of it are visible.
        let mut input = input(0.0);
        input.container_offset = Some(500.0);
        let window = compute_window(&input, WindowState::default());
        // ceil(300 / 200) = 2 rows in view plus 3 trailing overscan rows.
        assert_eq!(window.state, WindowState::new(0, 5 * 4));
        assert_eq!(window.report.last_visible_index, Some(8));
    }

    #[test]
    fn container_entirely_below_viewport_has_no_rows_in_view() {
        let mut input = input(0.0);
        input.container_offset = Some(5000.0);
        let window = compute_window(&input, WindowState::default());
        assert_eq!(window.state, WindowState::new(0, 3 * 4));
        assert_eq!(window.report.last_visible_index, Some(0));
    }

    #[test]
    fn last_visible_index_is_clamped_to_len() {
        let window = compute_window(&input(29_800.0), WindowState::default());
        assert_eq!(window.report.first_visible_index, Some(596));
        assert_eq!(window.report.last_visible_index, Some(600));
        // The realized window runs past the end; slicing clamps it.
        assert!(window.state.offset + window.state.visible > 600);
        assert_eq!(window.state.range(600), 584..600);
    }

    #[test]
    fn missing_inputs_return_fallback() {
        let fallback = WindowState::new(8, 16);

        let mut no_height = input(2000.0);
        no_height.item_height = None;
        let mut zero_height = input(2000.0);
        zero_height.item_height = Some(0.0);
        let mut no_geometry = input(2000.0);
        no_geometry.geometry = ViewportGeometry::UNMEASURED;
        let mut unmounted = input(2000.0);
        unmounted.container_offset = None;

        for input in [no_height, zero_height, no_geometry, unmounted] {
            assert_eq!(
                compute_window(&input, fallback),
                GridWindow {
                    state: fallback,
                    report: VisibilityReport::UNKNOWN,
                }
            );
        }
    }

    #[test]
    fn empty_container_measurement_is_unmeasured() {
        assert!(!ViewportGeometry::from_container(Size::new(0.0, 100.0)).is_known());
        assert!(!ViewportGeometry::from_container(Size::new(100.0, f64::NAN)).is_known());
        assert!(ViewportGeometry::from_container(Size::new(100.0, 100.0)).is_known());
    }

    #[test]
    fn range_clamps_offset_past_end() {
        assert_eq!(WindowState::new(40, 40).range(30), 30..30);
        assert_eq!(WindowState::new(0, 16).range(10), 0..10);
        assert_eq!(WindowState::new(usize::MAX, 4).range(10), 10..10);
    }
}
