// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for window computation.
//!
//! 1. The window offset never decreases as the scroll position increases.
//! 2. Overscan before the first visible row is bounded by `overscan_rows`.
//! 3. The last visible index never exceeds the item count.
//! 4. The clamped window range stays within `0..len`.
//! 5. Realized items carry the cached style for their index.

use core::num::NonZeroUsize;

use kurbo::Size;
use proptest::prelude::*;
use understory_virtual_grid::{
    GridConfig, ItemStyle, Viewport, ViewportGeometry, WindowController, WindowInput,
    WindowState, compute_window,
};

#[derive(Debug, Clone, Copy)]
struct Layout {
    item_height: f64,
    viewport_height: f64,
    container_offset: f64,
    columns: usize,
    overscan_rows: usize,
    len: usize,
}

fn layout_strategy() -> impl Strategy<Value = Layout> {
    (
        2.0_f64..400.0,
        0.0_f64..2000.0,
        0.0_f64..3000.0,
        1_usize..12,
        0_usize..6,
        0_usize..5000,
    )
        .prop_map(
            |(item_height, viewport_height, container_offset, columns, overscan_rows, len)| {
                Layout {
                    item_height,
                    viewport_height,
                    container_offset,
                    columns,
                    overscan_rows,
                    len,
                }
            },
        )
}

fn input(layout: Layout, scroll_top: f64) -> WindowInput {
    WindowInput {
        geometry: ViewportGeometry::from_container(Size::new(1000.0, 1000.0)),
        item_height: Some(layout.item_height),
        viewport: Viewport::new(scroll_top, layout.viewport_height),
        container_offset: Some(layout.container_offset),
        columns: NonZeroUsize::new(layout.columns).unwrap(),
        overscan_rows: layout.overscan_rows,
        len: layout.len,
    }
}

proptest! {
    #[test]
    fn offset_is_monotonic_in_scroll(
        layout in layout_strategy(),
        a in 0.0_f64..100_000.0,
        b in 0.0_f64..100_000.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let before = compute_window(&input(layout, low), WindowState::default());
        let after = compute_window(&input(layout, high), WindowState::default());
        prop_assert!(
            before.state.offset <= after.state.offset,
            "offset decreased: {:?} at {} then {:?} at {}",
            before.state, low, after.state, high
        );
    }

    #[test]
    fn overscan_before_is_bounded(layout in layout_strategy(), scroll_top in 0.0_f64..100_000.0) {
        let window = compute_window(&input(layout, scroll_top), WindowState::default());
        let first = window.report.first_visible_index.unwrap();
        prop_assert!(window.state.offset <= first);
        prop_assert!(first - window.state.offset <= layout.overscan_rows * layout.columns);
    }

    #[test]
    fn last_visible_index_is_clamped(layout in layout_strategy(), scroll_top in 0.0_f64..100_000.0) {
        let window = compute_window(&input(layout, scroll_top), WindowState::default());
        prop_assert!(window.report.last_visible_index.unwrap() <= layout.len);
    }

    #[test]
    fn window_is_whole_rows(layout in layout_strategy(), scroll_top in 0.0_f64..100_000.0) {
        let window = compute_window(&input(layout, scroll_top), WindowState::default());
        prop_assert_eq!(window.state.offset % layout.columns, 0);
        prop_assert_eq!(window.state.visible % layout.columns, 0);
        let range = window.state.range(layout.len);
        prop_assert!(range.start <= range.end && range.end <= layout.len);
    }

    #[test]
    fn realized_styles_match_row_and_column(
        layout in layout_strategy(),
        scrolls in proptest::collection::vec(0.0_f64..50_000.0, 1..8),
    ) {
        let items: Vec<usize> = (0..layout.len).collect();
        let config = GridConfig::default()
            .with_columns(layout.columns)
            .with_overscan_rows(layout.overscan_rows);
        let mut grid = WindowController::new(config, layout.len);
        grid.set_container_offset(Some(layout.container_offset));
        grid.observe_container(Size::new(1000.0, 1000.0));
        grid.observe_item_height(layout.item_height);

        for scroll_top in scrolls {
            grid.handle_scroll(Viewport::new(scroll_top, layout.viewport_height));
            for cell in grid.realize(&items) {
                let expected = ItemStyle::absolute(
                    cell.index / layout.columns,
                    cell.index % layout.columns,
                    NonZeroUsize::new(layout.columns).unwrap(),
                    layout.item_height,
                );
                prop_assert_eq!(cell.style, expected);
                prop_assert_eq!(*cell.item, cell.index);
            }
        }
    }
}
