// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtual_grid --heading-base-level=0

//! Understory Virtual Grid: viewport-driven windowing for fixed-column grids.
//!
//! This crate decides which items of a large grid need to exist at any moment
//! and where each of them goes, without knowing anything about how items are
//! drawn. The grid lives in a container whose height is reserved for every
//! row; only a window of rows around the viewport is realized, each item
//! absolutely positioned by its row and column.
//!
//! The core concepts are:
//!
//! - [`compute_window`]: a pure function that turns the scroll position,
//!   viewport height, container offset, row height, column count, and overscan
//!   into the realized [`WindowState`] and the on-screen [`VisibilityReport`].
//! - [`HeightTracker`]: keeps the last good row height, ignoring the zero or
//!   one pixel measurements hosts report while items mount.
//! - [`StyleCache`]: memoizes each item's [`ItemStyle`] so unchanged items get
//!   the same placement on every render.
//! - [`WindowController`]: owns all of the above for one grid, recomputes on
//!   every scroll or measurement, and hands back the realized items with their
//!   styles plus the [`ContainerStyle`].
//! - [`supports_passive`] and [`ScrollSource`]: the boundary to the host's
//!   scroll listener registration, with passive-listener detection.
//!
//! Hosts are responsible for:
//!
//! - Measuring the container and the reference item and feeding the sizes to
//!   [`WindowController::observe_container`] and
//!   [`WindowController::observe_item_height`].
//! - Forwarding scroll notifications to [`WindowController::handle_scroll`].
//! - Rendering what [`WindowController::render`] returns.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_virtual_grid::{GridConfig, ItemStyle, Viewport, WindowController};
//!
//! let items: Vec<u32> = (0..600).collect();
//! let mut grid = WindowController::new(GridConfig::default(), items.len());
//!
//! // Before any measurement, the default window is rendered in normal flow.
//! let cells = grid.render(&items, |item, style, is_reference| (*item, style, is_reference));
//! assert_eq!(cells.len(), 16);
//! assert!(cells.iter().all(|(_, style, _)| *style == ItemStyle::Flow));
//! assert!(cells[0].2);
//!
//! // The host measures the container and the reference item, then scrolls.
//! grid.set_container_offset(Some(0.0));
//! grid.observe_container(Size::new(1200.0, 800.0));
//! grid.observe_item_height(200.0);
//! grid.handle_scroll(Viewport::new(2000.0, 800.0));
//!
//! let cells = grid.realize(&items);
//! assert_eq!(cells.first().map(|c| c.index), Some(28));
//! assert_eq!(cells.len(), 40);
//! assert_eq!(grid.container_style().to_string(), "position: relative; height: 30000px");
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: enables `std` support in `kurbo`.
//! - `libm`: uses `libm` for `kurbo` in `no_std` builds.
//! - `tracing`: emits spans around window recomputation and realization.
//!
//! All extents and offsets are in one caller-chosen coordinate space
//! (typically logical pixels) and are expected to be finite.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod controller;
mod height;
mod passive;
mod style;
mod subscription;
mod util;
mod window;

pub use config::GridConfig;
pub use controller::{
    GridPhase, LayoutChange, ObserverId, RealizedItem, WindowController, WindowUpdate,
};
pub use height::{DEGENERATE_HEIGHT, HeightTracker};
pub use passive::{PassiveProbe, probe_passive, supports_passive};
pub use style::{CacheStats, ContainerStyle, ItemStyle, Length, StyleCache};
pub use subscription::{ListenerOptions, ProbeError, ScrollSource, ScrollSubscription};
pub use window::{
    GridWindow, Viewport, ViewportGeometry, VisibilityReport, WindowInput, WindowState,
    compute_window,
};
