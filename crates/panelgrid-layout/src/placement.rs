#![forbid(unsafe_code)]

//! Placement validation: bounds and overlap checks against a widget snapshot.
//!
//! [`is_valid`] runs on every pointer move during a drag, so it is a single
//! O(n) pass over the snapshot slice with no allocation.
//!
//! # Invariants
//!
//! 1. A candidate is valid only if `row >= 0`, `col >= 0`, `width, height >= 1`
//!    and `col + width <= columns`.
//! 2. A valid candidate intersects no widget except the excluded one.
//! 3. [`first_free_position`] always returns an in-bounds, non-overlapping
//!    position (at worst directly below every occupied row).

use crate::model::{GridPosition, Widget};

/// Half-open rectangle intersection test.
///
/// `[c1, c1+w1) × [r1, r1+h1)` and `[c2, c2+w2) × [r2, r2+h2)` intersect iff
/// `c1 < c2+w2 ∧ c2 < c1+w1 ∧ r1 < r2+h2 ∧ r2 < r1+h1`.
#[inline]
#[must_use]
pub fn intersects(a: &GridPosition, b: &GridPosition) -> bool {
    i64::from(a.col) < b.right()
        && i64::from(b.col) < a.right()
        && i64::from(a.row) < b.bottom()
        && i64::from(b.row) < a.bottom()
}

/// Whether a candidate lies fully inside a grid of `columns` columns.
#[inline]
#[must_use]
pub fn in_bounds(candidate: &GridPosition, columns: u16) -> bool {
    candidate.row >= 0
        && candidate.col >= 0
        && candidate.width >= 1
        && candidate.height >= 1
        && candidate.right() <= i64::from(columns)
}

/// Whether `candidate` can be committed against `widgets`.
///
/// The widget whose id equals `exclude_id` (the one being dragged) is ignored.
#[must_use]
pub fn is_valid(
    candidate: &GridPosition,
    widgets: &[Widget],
    exclude_id: Option<&str>,
    columns: u16,
) -> bool {
    in_bounds(candidate, columns)
        && !widgets
            .iter()
            .filter(|w| exclude_id != Some(w.id.as_str()))
            .any(|w| intersects(candidate, &w.grid_position))
}

/// Row-major first-fit slot for a `width × height` widget.
///
/// Scans rows from the top and columns left to right; the first candidate
/// that collides with nothing in `occupied` wins. `width` is clamped to
/// `[1, columns]` and `height` to `>= 1`.
#[must_use]
pub fn first_free_position(
    width: i32,
    height: i32,
    occupied: &[GridPosition],
    columns: u16,
) -> GridPosition {
    let columns = i32::from(columns.max(1));
    let width = width.clamp(1, columns);
    let height = height.max(1);
    let floor = occupied
        .iter()
        .map(GridPosition::bottom)
        .max()
        .unwrap_or(0)
        .clamp(0, i64::from(i32::MAX)) as i32;

    for row in 0..=floor {
        for col in 0..=(columns - width) {
            let candidate = GridPosition {
                row,
                col,
                width,
                height,
            };
            if !occupied.iter().any(|o| intersects(&candidate, o)) {
                return candidate;
            }
        }
    }
    // Unreachable for well-formed input: row `floor` is below every occupant.
    GridPosition {
        row: floor,
        col: 0,
        width,
        height,
    }
}
