#![forbid(unsafe_code)]

//! Per-cell highlight classification for the drag overlay.
//!
//! [`GridOverlay::compute`] is rebuilt from its inputs on every call and keeps
//! no state between frames.
//!
//! # Invariants
//!
//! 1. Every cell in `rows × columns` has exactly one [`CellState`].
//! 2. Hover classification takes precedence over occupancy.
//! 3. The dragged widget does not count as occupying its origin cells.
//!
//! # Failure Modes
//!
//! | Input | Result |
//! |-------|--------|
//! | Hover or widget extends past the last column | clipped to the grid |
//! | Rows beyond [`MAX_OVERLAY_ROWS`] | not classified |

use panelgrid_core::geometry::PxRect;
use serde::{Deserialize, Serialize};

use crate::geometry::{GridCell, GridConfig};
use crate::model::{GridPosition, Widget};

/// Upper bound on classified rows.
pub const MAX_OVERLAY_ROWS: u32 = 1024;

/// Visual state of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    #[default]
    Empty,
    Occupied,
    HoveredValid,
    HoveredInvalid,
}

/// A classified cell with its container-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayCell {
    pub cell: GridCell,
    pub state: CellState,
    pub rect: PxRect,
}

/// Row-major cell classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOverlay {
    columns: u16,
    rows: u32,
    states: Vec<CellState>,
}

impl GridOverlay {
    /// Classify every cell.
    ///
    /// Row count covers the lowest widget or hover edge; an empty grid still
    /// yields one row.
    #[must_use]
    pub fn compute(
        grid: &GridConfig,
        widgets: &[Widget],
        hover: Option<(GridPosition, bool)>,
        exclude_id: Option<&str>,
    ) -> Self {
        let columns = grid.columns.max(1);
        let others = || widgets.iter().filter(move |w| exclude_id != Some(w.id.as_str()));
        let lowest = others()
            .map(|w| w.grid_position.bottom())
            .chain(hover.map(|(p, _)| p.bottom()))
            .max()
            .unwrap_or(0);
        let rows = lowest.clamp(1, i64::from(MAX_OVERLAY_ROWS)) as u32;

        let mut overlay = Self {
            columns,
            rows,
            states: vec![CellState::Empty; rows as usize * usize::from(columns)],
        };
        for widget in others() {
            overlay.fill(&widget.grid_position, CellState::Occupied);
        }
        if let Some((position, is_valid)) = hover {
            let state = if is_valid {
                CellState::HoveredValid
            } else {
                CellState::HoveredInvalid
            };
            overlay.fill(&position, state);
        }
        overlay
    }

    #[must_use]
    pub fn columns(&self) -> u16 {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// State of one cell, `None` outside the classified area.
    #[must_use]
    pub fn state_at(&self, row: i32, col: i32) -> Option<CellState> {
        self.index(row, col).map(|i| self.states[i])
    }

    /// Number of cells in a given state.
    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }

    /// Classified cells with pixel rectangles, row-major.
    pub fn cells<'a>(&'a self, grid: &'a GridConfig) -> impl Iterator<Item = OverlayCell> + 'a {
        let columns = usize::from(self.columns);
        self.states.iter().enumerate().map(move |(i, state)| {
            // Indices are bounded by `rows × columns`, both within i32.
            let cell = GridCell::new((i / columns) as i32, (i % columns) as i32);
            let unit = GridPosition {
                row: cell.row,
                col: cell.col,
                width: 1,
                height: 1,
            };
            OverlayCell {
                cell,
                state: *state,
                rect: grid.position_rect(unit),
            }
        })
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        let row = u32::try_from(row).ok().filter(|r| *r < self.rows)?;
        let col = u16::try_from(col).ok().filter(|c| *c < self.columns)?;
        Some(row as usize * usize::from(self.columns) + usize::from(col))
    }

    fn fill(&mut self, position: &GridPosition, state: CellState) {
        let row_end = position.bottom().min(i64::from(self.rows));
        let col_end = position.right().min(i64::from(self.columns));
        let row_start = i64::from(position.row.max(0));
        let col_start = i64::from(position.col.max(0));
        for row in row_start..row_end {
            for col in col_start..col_end {
                // Bounded by `rows` and `columns` above.
                if let Some(i) = self.index(row as i32, col as i32) {
                    self.states[i] = state;
                }
            }
        }
    }
}
