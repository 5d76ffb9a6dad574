// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A stateful controller that owns one grid's window, measurements, and style cache.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use bitflags::bitflags;
use kurbo::Size;
use smallvec::SmallVec;

use crate::config::clamp_columns;
use crate::passive::supports_passive;
use crate::subscription::{ListenerOptions, ScrollSource, ScrollSubscription};
use crate::util::to_f64;
use crate::{
    CacheStats, ContainerStyle, GridConfig, HeightTracker, ItemStyle, StyleCache, Viewport,
    ViewportGeometry, VisibilityReport, WindowInput, WindowState, compute_window,
};

bitflags! {
    /// Inputs that changed since the window was last computed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayoutChange: u8 {
        /// The column count changed.
        const COLUMNS = 1 << 0;
        /// The retained row height changed (including to or from unknown).
        const ITEM_HEIGHT = 1 << 1;
        /// The container was measured with a new size.
        const GEOMETRY = 1 << 2;
        /// The overscan changed.
        const OVERSCAN = 1 << 3;
        /// The number of items changed.
        const ITEMS = 1 << 4;
        /// The container moved relative to the page.
        const CONTAINER_OFFSET = 1 << 5;
        /// The grid was mounted.
        const MOUNT = 1 << 6;
        /// The host scrolled.
        const SCROLL = 1 << 7;
    }
}

impl LayoutChange {
    /// Changes after which cached item styles may be stale.
    pub const STYLE_AFFECTING: Self = Self::COLUMNS
        .union(Self::ITEM_HEIGHT)
        .union(Self::GEOMETRY)
        .union(Self::MOUNT);

    /// Returns `true` if this change requires clearing the style cache.
    #[must_use]
    pub const fn invalidates_styles(self) -> bool {
        self.intersects(Self::STYLE_AFFECTING)
    }
}

/// How much the controller knows about the grid's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPhase {
    /// Neither the container size nor a complete set of measurements is known.
    Unmeasured,
    /// The container size is known but the row height is not.
    GeometryKnown,
    /// Container size and row height are known; windowing and absolute
    /// positioning are active.
    HeightKnown,
}

/// Notification sent to subscribers after every recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowUpdate {
    /// The window now in effect.
    pub state: WindowState,
    /// The on-screen range.
    pub report: VisibilityReport,
    /// What triggered the recompute.
    pub change: LayoutChange,
}

/// Identifies a subscriber registered with [`WindowController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// One realized item, in window order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealizedItem<'a, T> {
    /// Index of the item in the source slice.
    pub index: usize,
    /// The item itself.
    pub item: &'a T,
    /// Placement of the item inside the container.
    pub style: ItemStyle,
    /// `true` for the first realized item, which the host measures to learn
    /// the row height.
    pub is_reference: bool,
}

type Observer = Box<dyn FnMut(&WindowUpdate)>;
type ScrollCallback = Box<dyn FnMut(VisibilityReport)>;

/// Controller for a virtualized grid with a fixed column count.
///
/// This type:
/// - stores the configuration, item count, container measurements, and scroll
///   position of one grid,
/// - retains the last good row height through a [`HeightTracker`],
/// - recomputes the realized [`WindowState`] synchronously whenever any of
///   those inputs change, clearing its [`StyleCache`] first when the change
///   affects placement,
/// - notifies subscribers and the `on_scroll` callback after each recompute,
/// - produces the realized items with their styles, and the container style.
///
/// It does *not* render anything or listen to the host by itself; hosts feed
/// measurements and scroll positions in, and render what [`WindowController::render`]
/// or [`WindowController::realize`] hands back.
///
/// ```rust
/// use kurbo::Size;
/// use understory_virtual_grid::{GridConfig, Viewport, WindowController, WindowState};
///
/// let mut grid = WindowController::new(GridConfig::default(), 600);
/// assert_eq!(grid.window(), WindowState::new(0, 16));
///
/// grid.set_container_offset(Some(0.0));
/// grid.observe_container(Size::new(1200.0, 800.0));
/// grid.observe_item_height(200.0);
/// grid.handle_scroll(Viewport::new(2000.0, 800.0));
///
/// assert_eq!(grid.window(), WindowState::new(28, 40));
/// assert_eq!(grid.container_height(), Some(30000.0));
/// ```
pub struct WindowController {
    config: GridConfig,
    len: usize,
    geometry: ViewportGeometry,
    height: HeightTracker,
    container_offset: Option<f64>,
    viewport: Viewport,

    window: WindowState,
    report: VisibilityReport,
    styles: StyleCache,

    mounted: bool,
    on_scroll: Option<ScrollCallback>,
    observers: SmallVec<[(ObserverId, Observer); 2]>,
    next_observer: u32,
}

impl WindowController {
    /// Creates a controller for `len` items.
    ///
    /// Until measurements arrive, the window is
    /// `[default_offset, default_offset + default_visible)` from `config`.
    #[must_use]
    pub fn new(config: GridConfig, len: usize) -> Self {
        let window = WindowState::new(config.default_offset, config.default_visible);
        Self {
            config,
            len,
            geometry: ViewportGeometry::UNMEASURED,
            height: HeightTracker::new(),
            container_offset: None,
            viewport: Viewport::default(),
            window,
            report: VisibilityReport::UNKNOWN,
            styles: StyleCache::new(),
            mounted: false,
            on_scroll: None,
            observers: SmallVec::new(),
            next_observer: 0,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Returns the class name to apply to the container.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.config.class_name.as_deref()
    }

    /// Returns the number of items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the grid has no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the window now in effect.
    #[must_use]
    pub const fn window(&self) -> WindowState {
        self.window
    }

    /// Returns the on-screen range from the last recompute.
    #[must_use]
    pub const fn visibility(&self) -> VisibilityReport {
        self.report
    }

    /// Returns the realized indices, clamped to the item count.
    #[must_use]
    pub fn visible_indices(&self) -> Range<usize> {
        self.window.range(self.len)
    }

    /// Returns the retained row height.
    #[must_use]
    pub const fn item_height(&self) -> Option<f64> {
        self.height.get()
    }

    /// Returns the measured container geometry.
    #[must_use]
    pub const fn geometry(&self) -> ViewportGeometry {
        self.geometry
    }

    /// Returns the last scroll position seen.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Returns `true` between [`WindowController::mount`] and [`WindowController::unmount`].
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Returns how much of the layout is known.
    #[must_use]
    pub fn phase(&self) -> GridPhase {
        match (self.geometry.is_known(), self.height.get()) {
            (true, Some(_)) => GridPhase::HeightKnown,
            (true, None) => GridPhase::GeometryKnown,
            (false, _) => GridPhase::Unmeasured,
        }
    }

    /// Returns the style cache counters.
    #[must_use]
    pub const fn cache_stats(&self) -> CacheStats {
        self.styles.stats()
    }

    /// Returns the number of cached item styles.
    #[must_use]
    pub fn cached_styles(&self) -> usize {
        self.styles.len()
    }

    /// Sets the item count.
    ///
    /// Clearing the grid to zero items also forgets the row height, since no
    /// reference item remains to measure.
    pub fn set_len(&mut self, len: usize) {
        if len == self.len {
            return;
        }
        self.len = len;
        let mut change = LayoutChange::ITEMS;
        if len == 0 && self.height.get().is_some() {
            self.height.reset();
            change |= LayoutChange::ITEM_HEIGHT;
        }
        self.apply(change);
    }

    /// Sets the column count, clamping `0` to `1`.
    pub fn set_columns(&mut self, columns: usize) {
        let columns = clamp_columns(columns);
        if columns != self.config.columns {
            self.config.columns = columns;
            self.apply(LayoutChange::COLUMNS);
        }
    }

    /// Sets the overscan in rows.
    pub fn set_overscan_rows(&mut self, overscan_rows: usize) {
        if overscan_rows != self.config.overscan_rows {
            self.config.overscan_rows = overscan_rows;
            self.apply(LayoutChange::OVERSCAN);
        }
    }

    /// Feeds a container measurement from the host's resize observer.
    pub fn observe_container(&mut self, size: Size) {
        let geometry = ViewportGeometry::from_container(size);
        if geometry != self.geometry {
            self.geometry = geometry;
            self.apply(LayoutChange::GEOMETRY);
        }
    }

    /// Feeds a height measurement of the reference item.
    ///
    /// Degenerate measurements (at most one unit) are ignored once a real
    /// height has been seen.
    pub fn observe_item_height(&mut self, height: f64) {
        let previous = self.height.get();
        if self.height.observe(height) != previous {
            self.apply(LayoutChange::ITEM_HEIGHT);
        }
    }

    /// Sets the offset of the container's top edge from the top of the page.
    ///
    /// `None` means the container is not laid out, which suspends windowing.
    pub fn set_container_offset(&mut self, offset: Option<f64>) {
        let offset = offset.filter(|o| o.is_finite());
        if offset != self.container_offset {
            self.container_offset = offset;
            self.apply(LayoutChange::CONTAINER_OFFSET);
        }
    }

    /// Recomputes the window for a new scroll position.
    ///
    /// Every call recomputes, even if the position did not change.
    pub fn handle_scroll(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.apply(LayoutChange::SCROLL);
    }

    /// Mounts the grid and starts listening to `source`.
    ///
    /// The style cache is cleared and the window recomputed before the
    /// listener is registered. The listener is passive when the host supports
    /// it. Dropping the returned subscription (or passing it to
    /// [`WindowController::unmount`]) unregisters it.
    pub fn mount<S: ScrollSource>(
        &mut self,
        mut source: S,
        container_offset: f64,
        viewport: Viewport,
    ) -> ScrollSubscription<S> {
        self.mounted = true;
        self.container_offset = Some(container_offset).filter(|o| o.is_finite());
        self.viewport = viewport;
        self.apply(LayoutChange::MOUNT);

        let options = ListenerOptions::for_scroll(supports_passive(&mut source));
        ScrollSubscription::new(source, options)
    }

    /// Unmounts the grid and releases its scroll listener.
    pub fn unmount<S: ScrollSource>(&mut self, subscription: ScrollSubscription<S>) {
        drop(subscription);
        self.mounted = false;
        self.container_offset = None;
    }

    /// Sets the callback receiving the on-screen range after every recompute.
    pub fn set_on_scroll(&mut self, on_scroll: impl FnMut(VisibilityReport) + 'static) {
        self.on_scroll = Some(Box::new(on_scroll));
    }

    /// Removes the `on_scroll` callback.
    pub fn clear_on_scroll(&mut self) {
        self.on_scroll = None;
    }

    /// Registers `observer` to be called after every recompute.
    pub fn subscribe(&mut self, observer: impl FnMut(&WindowUpdate) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer = self.next_observer.wrapping_add(1);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes a subscriber. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(other, _)| *other != id);
        self.observers.len() != before
    }

    /// Returns the reserved container height, `ceil(len / columns) * item_height`.
    ///
    /// `None` while the row height is unknown.
    #[must_use]
    pub fn container_height(&self) -> Option<f64> {
        let rows = self.len.div_ceil(self.config.columns.get());
        self.height.get().map(|height| to_f64(rows) * height)
    }

    /// Returns the style to apply to the container.
    #[must_use]
    pub fn container_style(&self) -> ContainerStyle<'_> {
        ContainerStyle {
            height: self.container_height(),
            class_name: self.class_name(),
        }
    }

    /// Returns the realized items of `items` with their styles.
    ///
    /// `items` is the full collection; its length replaces the item count
    /// (recomputing if it changed). Styles are taken from the cache, computing
    /// only the ones not seen since the last invalidation.
    pub fn realize<'a, T>(&mut self, items: &'a [T]) -> Vec<RealizedItem<'a, T>> {
        self.set_len(items.len());
        let range = self.visible_indices();

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "realize_window",
            start = range.start,
            end = range.end,
            cached = self.styles.len()
        )
        .entered();

        let columns = self.config.columns;
        let item_height = self.height.get();
        let reference = range.start;
        let mut out = Vec::with_capacity(range.len());
        for index in range {
            let style = self.styles.style_for(
                index,
                index / columns.get(),
                index % columns.get(),
                columns,
                item_height,
            );
            out.push(RealizedItem {
                index,
                item: &items[index],
                style,
                is_reference: index == reference,
            });
        }
        out
    }

    /// Calls `render` once per realized item and collects the results.
    ///
    /// The callback receives the item, its style, and whether it is the
    /// reference item the host should measure.
    pub fn render<T, R>(
        &mut self,
        items: &[T],
        mut render: impl FnMut(&T, ItemStyle, bool) -> R,
    ) -> Vec<R> {
        self.realize(items)
            .into_iter()
            .map(|realized| render(realized.item, realized.style, realized.is_reference))
            .collect()
    }

    fn window_input(&self) -> WindowInput {
        WindowInput {
            geometry: self.geometry,
            item_height: self.height.get(),
            viewport: self.viewport,
            container_offset: self.container_offset,
            columns: self.config.columns,
            overscan_rows: self.config.overscan_rows,
            len: self.len,
        }
    }

    /// Recomputes the window after `change`, then notifies.
    fn apply(&mut self, change: LayoutChange) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "recompute_window",
            change = ?change,
            len = self.len,
            scroll_top = self.viewport.scroll_top
        )
        .entered();

        if change.invalidates_styles() {
            #[cfg(feature = "tracing")]
            tracing::trace!(entries = self.styles.len(), "clearing style cache");
            self.styles.clear();
        }

        let window = compute_window(&self.window_input(), self.window);
        self.window = window.state;
        self.report = window.report;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            offset = self.window.offset,
            visible = self.window.visible,
            first_visible = ?self.report.first_visible_index,
            last_visible = ?self.report.last_visible_index,
            "window recomputed"
        );

        let update = WindowUpdate {
            state: self.window,
            report: self.report,
            change,
        };
        for (_, observer) in &mut self.observers {
            observer(&update);
        }
        if let Some(on_scroll) = self.on_scroll.as_mut() {
            on_scroll(self.report);
        }
    }
}

impl fmt::Debug for WindowController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowController")
            .field("config", &self.config)
            .field("len", &self.len)
            .field("geometry", &self.geometry)
            .field("height", &self.height)
            .field("container_offset", &self.container_offset)
            .field("viewport", &self.viewport)
            .field("window", &self.window)
            .field("report", &self.report)
            .field("styles", &self.styles)
            .field("mounted", &self.mounted)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
