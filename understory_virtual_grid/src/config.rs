// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration.

use alloc::string::String;
use core::num::NonZeroUsize;

/// Configuration of a virtualized grid.
///
/// All fields have defaults; use the `with_*` builders to override them.
///
/// ```rust
/// use understory_virtual_grid::GridConfig;
///
/// let config = GridConfig::default().with_columns(3).with_overscan_rows(1);
/// assert_eq!(config.columns.get(), 3);
/// assert_eq!(config.default_visible, 16);
///
/// // Zero columns cannot be laid out; the count is clamped to one.
/// assert_eq!(GridConfig::default().with_columns(0).columns.get(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    /// Number of columns per row.
    pub columns: NonZeroUsize,
    /// Rows realized beyond the visible ones, on each side.
    pub overscan_rows: usize,
    /// Number of items realized before anything has been measured.
    pub default_visible: usize,
    /// Index of the first item realized before anything has been measured.
    pub default_offset: usize,
    /// Class name passed through to the container.
    pub class_name: Option<String>,
}

impl GridConfig {
    /// Default column count.
    pub const DEFAULT_COLUMNS: NonZeroUsize = NonZeroUsize::new(4).unwrap();
    /// Default overscan, in rows.
    pub const DEFAULT_OVERSCAN_ROWS: usize = 3;
    /// Default number of items realized before measurement.
    pub const DEFAULT_VISIBLE: usize = 16;

    /// Sets the column count, clamping `0` to `1`.
    #[must_use]
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = clamp_columns(columns);
        self
    }

    /// Sets the overscan in rows.
    #[must_use]
    pub fn with_overscan_rows(mut self, overscan_rows: usize) -> Self {
        self.overscan_rows = overscan_rows;
        self
    }

    /// Sets how many items are realized before measurement.
    #[must_use]
    pub fn with_default_visible(mut self, default_visible: usize) -> Self {
        self.default_visible = default_visible;
        self
    }

    /// Sets the first item realized before measurement.
    #[must_use]
    pub fn with_default_offset(mut self, default_offset: usize) -> Self {
        self.default_offset = default_offset;
        self
    }

    /// Sets the container class name.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: Self::DEFAULT_COLUMNS,
            overscan_rows: Self::DEFAULT_OVERSCAN_ROWS,
            default_visible: Self::DEFAULT_VISIBLE,
            default_offset: 0,
            class_name: None,
        }
    }
}

/// Converts a requested column count into a usable one.
pub(crate) fn clamp_columns(columns: usize) -> NonZeroUsize {
    NonZeroUsize::new(columns).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::GridConfig;

    #[test]
    fn defaults_match_documented_values() {
        let config = GridConfig::default();
        assert_eq!(config.columns.get(), 4);
        assert_eq!(config.overscan_rows, 3);
        assert_eq!(config.default_visible, 16);
        assert_eq!(config.default_offset, 0);
        assert_eq!(config.class_name, None);
    }

    #[test]
    fn builders_override_fields() {
        let config = GridConfig::default()
            .with_columns(6)
            .with_overscan_rows(0)
            .with_default_visible(24)
            .with_default_offset(12)
            .with_class_name("gallery");
        assert_eq!(config.columns.get(), 6);
        assert_eq!(config.overscan_rows, 0);
        assert_eq!(config.default_visible, 24);
        assert_eq!(config.default_offset, 12);
        assert_eq!(config.class_name.as_deref(), Some("gallery"));
    }
}
