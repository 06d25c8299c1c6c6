#![forbid(unsafe_code)]

//! Grid geometry: column count, cell size and pixel↔cell conversion.
//!
//! Every function here is pure and deterministic: the same inputs always
//! produce the same outputs, with no hidden state.
//!
//! # Invariants
//!
//! 1. `columns_for` is monotonic non-decreasing in width and never returns 0.
//! 2. `cell_size` never returns less than the configured minimum.
//! 3. `pixel_to_cell` clamps `col` to `[0, columns - 1]` and `row` to `>= 0`.
//! 4. For any point `p`, let `c = pixel_to_cell(p)`; then
//!    `pixel_to_cell(origin + cell_to_pixel_rect(c).origin) == c`.
//!
//! # Failure Modes
//!
//! | Input | Result |
//! |-------|--------|
//! | Container narrower than one minimum cell | 1 column, minimum cell size |
//! | Non-finite width or pointer | treated as 0 |

use panelgrid_core::geometry::{Point, PxRect};
use serde::{Deserialize, Serialize};

use crate::config::GridSettings;
use crate::model::GridPosition;
use crate::Breakpoint;

/// Smallest cell edge, in pixels, the grid will produce.
pub const DEFAULT_MIN_CELL_PX: f64 = 40.0;

/// Slack added before flooring so that a cell's own top-left corner maps
/// back into that cell despite floating-point rounding.
const CELL_SNAP_EPSILON: f64 = 1e-9;

/// A single grid cell address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCell {
    pub row: i32,
    pub col: i32,
}

impl GridCell {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Derived grid metrics for one container width. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub columns: u16,
    /// Edge length of one square cell, in pixels.
    pub cell_size: f64,
    /// Gutter between adjacent cells, in pixels.
    pub gap: f64,
    /// Top-left of cell `(0, 0)` in container coordinates.
    pub origin: Point,
    /// Tier the container width classified as.
    pub breakpoint: Breakpoint,
    /// The container width these metrics were derived from.
    pub container_width: f64,
}

impl GridConfig {
    /// Derive grid metrics for a container width.
    ///
    /// The breakpoint column count is reduced while cells would fall below
    /// `min_cell_px`, never going under one column.
    #[must_use]
    pub fn from_width(container_width: f64, settings: &GridSettings) -> Self {
        let width = sanitize(container_width);
        let breakpoint = settings.breakpoints.classify(width);
        let content = PxRect::new(0.0, 0.0, width, 0.0).inner(settings.padding_px);
        let content_width = content.width;
        let mut columns = columns_for(width, settings);
        while columns > 1
            && raw_cell_size(content_width, columns, settings.gap_px) < settings.min_cell_px
        {
            columns -= 1;
        }
        let cell_size =
            raw_cell_size(content_width, columns, settings.gap_px).max(settings.min_cell_px);

        Self {
            columns,
            cell_size,
            gap: settings.gap_px,
            origin: content.origin(),
            breakpoint,
            container_width: width,
        }
    }

    /// Distance between the leading edges of adjacent cells.
    #[inline]
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.cell_size + self.gap
    }

    /// Convert a container-space pointer position to a cell.
    #[inline]
    #[must_use]
    pub fn pixel_to_cell(&self, point: Point) -> GridCell {
        pixel_to_cell(point, self.origin, self.cell_size, self.gap, self.columns)
    }

    /// Container-space rectangle covered by a position.
    #[inline]
    #[must_use]
    pub fn position_rect(&self, position: GridPosition) -> PxRect {
        cell_to_pixel_rect(position, self.cell_size, self.gap).translate(self.origin)
    }

    /// Total content height (pixels) of `rows` grid rows, without trailing gap.
    #[must_use]
    pub fn rows_height(&self, rows: u32) -> f64 {
        if rows == 0 {
            return 0.0;
        }
        f64::from(rows) * self.cell_size + f64::from(rows - 1) * self.gap
    }
}

/// Column count for a container width, from the breakpoint map.
///
/// Monotonic non-decreasing in width as long as the configured map is (which
/// [`EngineConfig::validate`](crate::config::EngineConfig::validate) enforces).
#[must_use]
pub fn columns_for(width_px: f64, settings: &GridSettings) -> u16 {
    let breakpoint = settings.breakpoints.classify(sanitize(width_px));
    (*settings.columns.resolve(breakpoint)).max(1)
}

/// `(width - gap * (columns - 1)) / columns`, clamped to [`DEFAULT_MIN_CELL_PX`].
#[must_use]
pub fn cell_size(width_px: f64, columns: u16, gap_px: f64) -> f64 {
    raw_cell_size(sanitize(width_px), columns, gap_px).max(DEFAULT_MIN_CELL_PX)
}

fn raw_cell_size(width_px: f64, columns: u16, gap_px: f64) -> f64 {
    let columns = f64::from(columns.max(1));
    (width_px - gap_px * (columns - 1.0)) / columns
}

/// Map a pointer position to the cell under it.
///
/// Points inside a gutter belong to the cell on their left/top.
#[must_use]
pub fn pixel_to_cell(
    point: Point,
    origin: Point,
    cell_size: f64,
    gap: f64,
    columns: u16,
) -> GridCell {
    let pitch = cell_size + gap;
    if !(pitch > 0.0) {
        return GridCell::default();
    }
    let dx = sanitize(point.x - origin.x);
    let dy = sanitize(point.y - origin.y);
    let max_col = i32::from(columns.max(1)) - 1;
    // `as` saturates on overflow.
    let col = (dx / pitch + CELL_SNAP_EPSILON).floor() as i32;
    let row = (dy / pitch + CELL_SNAP_EPSILON).floor() as i32;
    GridCell {
        row: row.max(0),
        col: col.clamp(0, max_col),
    }
}

/// Grid-origin-relative pixel rectangle covered by a position.
///
/// Internal gutters are included in the span; the trailing gutter is not.
#[must_use]
pub fn cell_to_pixel_rect(position: GridPosition, cell_size: f64, gap: f64) -> PxRect {
    let pitch = cell_size + gap;
    let width = f64::from(position.width.max(1));
    let height = f64::from(position.height.max(1));
    PxRect::new(
        f64::from(position.col) * pitch,
        f64::from(position.row) * pitch,
        width * cell_size + (width - 1.0) * gap,
        height * cell_size + (height - 1.0) * gap,
    )
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
