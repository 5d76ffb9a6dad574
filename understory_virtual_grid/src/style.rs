// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item placement styles and the cache that keeps them stable.
//!
//! Items are placed by row and column inside a relatively positioned container.
//! Once the row height is known every realized item gets an absolute position;
//! before that, items are left in normal flow so the host can measure one.
//!
//! Styles are memoized per index in a [`StyleCache`]. Handing the same value
//! back on every render lets hosts skip re-applying unchanged layout, which is
//! what keeps fast scrolling from thrashing layout. The cache is cleared
//! explicitly by its owner whenever the column count, row height, or container
//! geometry changes.

use core::fmt;
use core::num::NonZeroUsize;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::util::to_f64;

/// A CSS-style length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Percentage of the containing block, rendered as `<value>%`.
    Percent(f64),
    /// Logical pixels, rendered as `<value>px`.
    Px(f64),
}

impl Length {
    /// Returns the numeric part, without its unit.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Percent(v) | Self::Px(v) => v,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(v) => write!(f, "{v}%"),
            Self::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// Placement of a single realized item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemStyle {
    /// Row height unknown: the item stays in normal flow, un-positioned.
    Flow,
    /// Row height known: the item is absolutely positioned by row and column.
    Absolute {
        /// Horizontal offset, `column * (100 / columns)` percent.
        left: Length,
        /// Vertical offset, `row * item_height` pixels.
        top: Length,
        /// Cell width, `100 / columns` percent.
        width: Length,
    },
}

impl ItemStyle {
    /// Computes the absolute placement for the cell at `row`/`column`.
    #[must_use]
    pub fn absolute(row: usize, column: usize, columns: NonZeroUsize, item_height: f64) -> Self {
        let column_width = 100.0 / to_f64(columns.get());
        Self::Absolute {
            left: Length::Percent(to_f64(column) * column_width),
            top: Length::Px(to_f64(row) * item_height),
            width: Length::Percent(column_width),
        }
    }

    /// Returns `true` if this style positions the item absolutely.
    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute { .. })
    }
}

impl fmt::Display for ItemStyle {
    /// Writes the style as inline CSS declarations; [`ItemStyle::Flow`] is empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flow => Ok(()),
            Self::Absolute { left, top, width } => {
                write!(
                    f,
                    "position: absolute; left: {left}; top: {top}; width: {width}"
                )
            }
        }
    }
}

/// Style of the grid container.
///
/// The container is always relatively positioned so absolutely placed items
/// anchor to it. Its height reserves room for the full grid once the row
/// height is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerStyle<'a> {
    /// Reserved height in pixels, `None` while the row height is unknown.
    pub height: Option<f64>,
    /// Caller-supplied class name passed through to the container.
    pub class_name: Option<&'a str>,
}

impl fmt::Display for ContainerStyle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("position: relative")?;
        if let Some(height) = self.height {
            write!(f, "; height: {}", Length::Px(height))?;
        }
        Ok(())
    }
}

/// Hit/miss counters for a [`StyleCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that computed and stored a new style.
    pub misses: usize,
}

/// Memoized [`ItemStyle`]s keyed by item index.
///
/// An entry, once computed, is returned verbatim until [`StyleCache::clear`]
/// is called, even if the arguments of a later lookup differ. Owners must
/// clear the cache when the column count or row height changes.
#[derive(Debug, Clone, Default)]
pub struct StyleCache {
    entries: HashMap<usize, ItemStyle>,
    stats: CacheStats,
}

impl StyleCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the style for `index`, computing and storing it on first use.
    ///
    /// With an unknown `item_height` this returns [`ItemStyle::Flow`] and
    /// leaves the entry empty, so the real placement is computed once the
    /// height arrives.
    ///
    /// ```rust
    /// use core::num::NonZeroUsize;
    /// use understory_virtual_grid::{ItemStyle, StyleCache};
    ///
    /// let columns = NonZeroUsize::new(4).unwrap();
    /// let mut cache = StyleCache::new();
    ///
    /// assert_eq!(cache.style_for(5, 1, 1, columns, None), ItemStyle::Flow);
    ///
    /// let style = cache.style_for(5, 1, 1, columns, Some(200.0));
    /// assert_eq!(style.to_string(), "position: absolute; left: 25%; top: 200px; width: 25%");
    /// ```
    pub fn style_for(
        &mut self,
        index: usize,
        row: usize,
        column: usize,
        columns: NonZeroUsize,
        item_height: Option<f64>,
    ) -> ItemStyle {
        let Some(item_height) = item_height else {
            return ItemStyle::Flow;
        };
        match self.entries.entry(index) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                *entry.get()
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                *entry.insert(ItemStyle::absolute(row, column, columns, item_height))
            }
        }
    }

    /// Returns the cached style for `index` without computing one.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemStyle> {
        self.entries.get(&index)
    }

    /// Drops every cached entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the hit/miss counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}
