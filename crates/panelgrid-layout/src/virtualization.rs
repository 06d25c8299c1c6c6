#![forbid(unsafe_code)]

//! Scroll windowing for large widget collections.
//!
//! The host calls [`compute_window`] on each scroll tick and renders only
//! `items[window.visible_range()]`, padding above and below with spacer
//! elements of [`VisibleWindow::leading_spacer_px`] and
//! [`VisibleWindow::trailing_spacer_px`] so the scrollbar keeps the full
//! content height.
//!
//! # Invariants
//!
//! 1. `leading + visible_rows * item_height + trailing == total_rows * item_height`.
//! 2. `row_start <= row_end <= total_rows`.
//! 3. Collections of at most `threshold` items always render directly.
//!
//! # Failure Modes
//!
//! | Input | Result |
//! |-------|--------|
//! | Negative or non-finite `scroll_top` | treated as 0 |
//! | Scrolled past the end | empty visible range, leading spacer covers everything |
//! | Non-positive or non-finite item height | every row visible, no spacers |
//! | `items_per_row == 0` | treated as 1 |

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Windowing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualizationConfig {
    /// Collections with at most this many items bypass windowing.
    pub threshold: usize,
    /// Extra rows rendered past the bottom of the viewport.
    pub buffer_rows: usize,
    /// Row height override. `None` means one grid pitch (cell size + gap).
    pub item_height_px: Option<f64>,
}

impl Default for VirtualizationConfig {
    fn default() -> Self {
        Self {
            threshold: 15,
            buffer_rows: 1,
            item_height_px: None,
        }
    }
}

impl VirtualizationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_rows == 0 {
            return Err(ConfigError::ZeroBufferRows);
        }
        match self.item_height_px {
            Some(value) if !(value.is_finite() && value > 0.0) => {
                Err(ConfigError::InvalidItemHeight { value })
            }
            _ => Ok(()),
        }
    }

    /// Row height to use given the grid pitch.
    #[must_use]
    pub fn item_height(&self, grid_pitch: f64) -> f64 {
        self.item_height_px.unwrap_or(grid_pitch)
    }
}

/// Scroll container state in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(scroll_top: f64, viewport_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
        }
    }
}

/// How the collection is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Every item renders; spacers are zero.
    Direct,
    /// Only the visible rows render.
    Virtualized,
}

/// Result of one windowing pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleWindow {
    pub mode: WindowMode,
    pub total_items: usize,
    pub items_per_row: usize,
    pub total_rows: usize,
    /// First rendered row (inclusive).
    pub row_start: usize,
    /// Last rendered row (exclusive).
    pub row_end: usize,
    pub item_height: f64,
    pub leading_spacer_px: f64,
    pub trailing_spacer_px: f64,
}

impl VisibleWindow {
    /// Number of rendered rows.
    #[must_use]
    pub fn visible_rows(&self) -> usize {
        self.row_end.saturating_sub(self.row_start)
    }

    /// Index range of rendered items.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        let start = self
            .row_start
            .saturating_mul(self.items_per_row)
            .min(self.total_items);
        let end = self
            .row_end
            .saturating_mul(self.items_per_row)
            .min(self.total_items);
        start..end
    }

    /// Rendered slice of `items`.
    ///
    /// `items` is expected to hold `total_items` entries; a shorter slice is
    /// truncated rather than indexed out of bounds.
    #[must_use]
    pub fn visible_items<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.visible_range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }

    #[must_use]
    pub fn is_virtualized(&self) -> bool {
        self.mode == WindowMode::Virtualized
    }

    /// Full content height represented by spacers plus rendered rows.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.leading_spacer_px
            + self.visible_rows() as f64 * self.item_height
            + self.trailing_spacer_px
    }
}

/// Compute the rendered window for a scroll position.
///
/// ```
/// use panelgrid_layout::{ScrollMetrics, VirtualizationConfig, compute_window};
///
/// let window = compute_window(
///     ScrollMetrics::new(650.0, 600.0),
///     300.0,
///     2,
///     40,
///     &VirtualizationConfig::default(),
/// );
/// assert_eq!((window.row_start, window.row_end), (2, 5));
/// assert_eq!(window.visible_range(), 4..10);
/// assert_eq!(window.leading_spacer_px, 600.0);
/// ```
#[must_use]
pub fn compute_window(
    metrics: ScrollMetrics,
    item_height: f64,
    items_per_row: usize,
    total_items: usize,
    config: &VirtualizationConfig,
) -> VisibleWindow {
    let items_per_row = items_per_row.max(1);
    let total_rows = total_items.div_ceil(items_per_row);
    let full = VisibleWindow {
        mode: WindowMode::Direct,
        total_items,
        items_per_row,
        total_rows,
        row_start: 0,
        row_end: total_rows,
        item_height,
        leading_spacer_px: 0.0,
        trailing_spacer_px: 0.0,
    };

    if total_items <= config.threshold {
        return full;
    }
    if !(item_height.is_finite() && item_height > 0.0) {
        return VisibleWindow {
            mode: WindowMode::Virtualized,
            ..full
        };
    }

    let scroll_top = non_negative(metrics.scroll_top);
    let viewport_height = non_negative(metrics.viewport_height);
    // `as` saturates, so huge offsets land past the end and are clamped.
    let row_start = ((scroll_top / item_height).floor() as usize).min(total_rows);
    let rows_in_view = (viewport_height / item_height).ceil() as usize;
    let row_end = row_start
        .saturating_add(rows_in_view)
        .saturating_add(config.buffer_rows.max(1))
        .min(total_rows);

    VisibleWindow {
        mode: WindowMode::Virtualized,
        row_start,
        row_end,
        leading_spacer_px: row_start as f64 * item_height,
        trailing_spacer_px: (total_rows - row_end) as f64 * item_height,
        ..full
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
