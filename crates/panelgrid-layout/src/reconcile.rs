#![forbid(unsafe_code)]

//! Snapshot audit and convergence.
//!
//! A snapshot can break layout invariants without any drag: the column count
//! drops on resize, or the store rejects a commit and pushes an older layout.
//! [`audit`] reports what is wrong; [`reconcile`] also proposes the minimal
//! set of position updates that makes the layout valid again.
//!
//! Repairs are applied in reading order (row, then column, then snapshot
//! index), so widgets nearer the top-left keep their place and later ones
//! move:
//!
//! 1. Spans below 1 are raised to 1.
//! 2. Width is clamped to the column count.
//! 3. Negative row/col are raised to 0; a widget past the right edge shifts left.
//! 4. A widget still overlapping an already-placed one is relocated to the
//!    first free row-major slot.
//!
//! Widgets sharing an id are reported and left untouched since an update
//! could not address them individually.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{GridPosition, UpdateRequest, UpdateSink, Widget, WidgetUpdate};
use crate::placement::{first_free_position, intersects};

/// What is wrong with a widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// Width or height below 1.
    InvalidSpan,
    /// Wider than the grid.
    TooWide { columns: u16 },
    /// Negative row/col, or extends past the last column.
    OutOfBounds { columns: u16 },
    /// Intersects another widget.
    Overlap { other_id: String },
    /// Id already used by an earlier widget in the snapshot.
    DuplicateId,
}

/// One invariant violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub widget_id: String,
    pub position: GridPosition,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget {} at {}: ", self.widget_id, self.position)?;
        match &self.kind {
            ViolationKind::InvalidSpan => f.write_str("span below 1x1"),
            ViolationKind::TooWide { columns } => write!(f, "wider than {columns} columns"),
            ViolationKind::OutOfBounds { columns } => {
                write!(f, "outside a {columns}-column grid")
            }
            ViolationKind::Overlap { other_id } => write!(f, "overlaps {other_id}"),
            ViolationKind::DuplicateId => f.write_str("duplicate id"),
        }
    }
}

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub violations: Vec<Violation>,
    /// One position update per moved widget, in repair order.
    pub updates: Vec<UpdateRequest>,
}

impl ReconcileReport {
    /// Whether the snapshot was already valid.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Send every corrective update to `sink`.
    pub fn dispatch(&self, sink: &mut dyn UpdateSink) {
        for request in &self.updates {
            request.dispatch(sink);
        }
    }

    /// Apply the corrective updates to a local snapshot copy.
    pub fn apply_to(&self, widgets: &mut [Widget]) {
        for request in &self.updates {
            if let Some(widget) = widgets.iter_mut().find(|w| w.id == request.widget_id) {
                request.update.apply_to(widget);
            }
        }
    }
}

/// Report every violation in `widgets` for a `columns`-wide grid.
///
/// Overlaps are reported once per pair, on the later widget.
#[must_use]
pub fn audit(widgets: &[Widget], columns: u16) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen = FxHashSet::default();
    for (index, widget) in widgets.iter().enumerate() {
        let position = widget.grid_position;
        let mut push = |kind| {
            violations.push(Violation {
                widget_id: widget.id.clone(),
                position,
                kind,
            });
        };
        if !seen.insert(widget.id.as_str()) {
            push(ViolationKind::DuplicateId);
        }
        if position.width < 1 || position.height < 1 {
            push(ViolationKind::InvalidSpan);
        }
        if i64::from(position.width) > i64::from(columns) {
            push(ViolationKind::TooWide { columns });
        }
        if position.row < 0 || position.col < 0 || position.right() > i64::from(columns) {
            push(ViolationKind::OutOfBounds { columns });
        }
        if let Some(other) = widgets[..index]
            .iter()
            .find(|other| intersects(&position, &other.grid_position))
        {
            push(ViolationKind::Overlap {
                other_id: other.id.clone(),
            });
        }
    }
    violations
}

/// Audit `widgets` and propose updates that restore every layout invariant.
///
/// Applying [`ReconcileReport::updates`] yields a snapshot whose
/// [`audit`] reports nothing but duplicate ids.
#[must_use]
pub fn reconcile(widgets: &[Widget], columns: u16) -> ReconcileReport {
    let columns = columns.max(1);
    let violations = audit(widgets, columns);
    for violation in &violations {
        warn!(
            target: "panelgrid::reconcile",
            widget_id = %violation.widget_id,
            position = %violation.position,
            kind = ?violation.kind,
            "layout violation"
        );
    }

    let mut seen = FxHashSet::default();
    let mut repair_order: Vec<(usize, &Widget)> = widgets
        .iter()
        .enumerate()
        .filter(|(_, w)| seen.insert(w.id.as_str()))
        .collect();
    // Duplicated ids are excluded from repair entirely.
    let duplicated: FxHashSet<&str> = violations
        .iter()
        .filter(|v| v.kind == ViolationKind::DuplicateId)
        .map(|v| v.widget_id.as_str())
        .collect();
    repair_order.retain(|(_, w)| !duplicated.contains(w.id.as_str()));
    repair_order.sort_by_key(|(index, w)| (w.grid_position.row, w.grid_position.col, *index));

    let width_limit = i32::from(columns);
    let mut placed: Vec<GridPosition> = widgets
        .iter()
        .filter(|w| duplicated.contains(w.id.as_str()))
        .map(|w| w.grid_position)
        .collect();
    let mut updates = Vec::new();

    for (_, widget) in repair_order {
        let original = widget.grid_position;
        let width = original.width.clamp(1, width_limit);
        let height = original.height.max(1);
        let row = original.row.max(0);
        let col = original.col.clamp(0, width_limit - width);
        let mut repaired = GridPosition {
            row,
            col,
            width,
            height,
        };
        if placed.iter().any(|p| intersects(&repaired, p)) {
            repaired = first_free_position(width, height, &placed, columns);
        }
        placed.push(repaired);

        if repaired != original {
            warn!(
                target: "panelgrid::reconcile",
                widget_id = %widget.id,
                from = %original,
                to = %repaired,
                "relocating widget"
            );
            updates.push(UpdateRequest::new(
                widget.id.clone(),
                WidgetUpdate::position(repaired),
            ));
        }
    }

    ReconcileReport {
        violations,
        updates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: i32, col: i32, width: i32, height: i32) -> GridPosition {
        GridPosition {
            row,
            col,
            width,
            height,
        }
    }

    fn widget(id: &str, p: GridPosition) -> Widget {
        Widget::new(id, "notes", p)
    }

    #[test]
    fn valid_layout_is_clean() {
        let widgets = vec![widget("a", pos(0, 0, 2, 2)), widget("b", pos(0, 2, 2, 1))];
        let report = reconcile(&widgets, 4);
        assert!(report.is_clean());
        assert!(report.updates.is_empty());
    }

    #[test]
    fn column_drop_shifts_widget_left() {
        let widgets = vec![widget("a", pos(0, 0, 1, 1)), widget("c", pos(1, 1, 2, 1))];
        let report = reconcile(&widgets, 2);
        assert_eq!(
            report.violations,
            vec![Violation {
                widget_id: "c".into(),
                position: pos(1, 1, 2, 1),
                kind: ViolationKind::OutOfBounds { columns: 2 },
            }]
        );
        assert_eq!(
            report.updates,
            vec![UpdateRequest::new("c", WidgetUpdate::position(pos(1, 0, 2, 1)))]
        );
    }

    #[test]
    fn too_wide_is_clamped() {
        let widgets = vec![widget("wide", pos(0, 0, 4, 1))];
        let report = reconcile(&widgets, 3);
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::TooWide { columns: 3 }));
        assert_eq!(report.updates[0].update.grid_position, Some(pos(0, 0, 3, 1)));
    }

    #[test]
    fn overlap_relocates_later_widget() {
        let widgets = vec![widget("a", pos(0, 0, 2, 2)), widget("b", pos(1, 1, 1, 1))];
        let report = reconcile(&widgets, 4);
        assert_eq!(
            report.violations[0].kind,
            ViolationKind::Overlap {
                other_id: "a".into()
            }
        );
        assert_eq!(report.updates.len(), 1);
        assert_eq!(report.updates[0].widget_id, "b");
        assert_eq!(report.updates[0].update.grid_position, Some(pos(0, 2, 1, 1)));
    }

    #[test]
    fn repaired_snapshot_audits_clean() {
        let mut widgets = vec![
            widget("a", pos(0, 2, 2, 2)),
            widget("b", pos(0, 0, 4, 1)),
            widget("c", pos(-1, 3, 1, 0)),
            widget("d", pos(1, 1, 3, 1)),
        ];
        let report = reconcile(&widgets, 3);
        assert!(!report.is_clean());
        report.apply_to(&mut widgets);
        assert_eq!(audit(&widgets, 3), Vec::new());
    }

    #[test]
    fn duplicate_ids_are_reported_not_moved() {
        let widgets = vec![widget("x", pos(0, 0, 1, 1)), widget("x", pos(0, 0, 1, 1))];
        let report = reconcile(&widgets, 4);
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::DuplicateId));
        assert!(report.updates.is_empty());
    }

    #[test]
    fn dispatch_sends_updates() {
        let widgets = vec![widget("c", pos(0, 3, 2, 1))];
        let report = reconcile(&widgets, 4);
        let mut sink: Vec<UpdateRequest> = Vec::new();
        report.dispatch(&mut sink);
        assert_eq!(sink, report.updates);
    }

    #[test]
    fn violation_display() {
        let v = Violation {
            widget_id: "c".into(),
            position: pos(0, 1, 2, 1),
            kind: ViolationKind::OutOfBounds { columns: 2 },
        };
        assert_eq!(v.to_string(), "widget c at r0c1 2x1: outside a 2-column grid");
    }
}
