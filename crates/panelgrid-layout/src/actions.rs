#![forbid(unsafe_code)]

//! Discrete widget actions outside the pointer drag.
//!
//! Each action reads a snapshot and returns at most one [`UpdateRequest`];
//! `None` means the action was rejected or would change nothing.

use panelgrid_core::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::model::{GridPosition, UpdateRequest, Widget, WidgetUpdate, WidgetWidth, find_widget};
use crate::placement::is_valid;

/// One-cell keyboard move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl NudgeDirection {
    /// Arrow keys map to directions.
    #[must_use]
    pub const fn from_key(code: &KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            _ => None,
        }
    }

    /// `(d_row, d_col)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Move a widget one cell; only a valid destination yields a request.
#[must_use]
pub fn nudge(
    widgets: &[Widget],
    widget_id: &str,
    direction: NudgeDirection,
    columns: u16,
) -> Option<UpdateRequest> {
    let widget = find_widget(widgets, widget_id)?;
    let current = widget.grid_position;
    let (d_row, d_col) = direction.delta();
    let target = current.moved_to(
        current.row.checked_add(d_row)?,
        current.col.checked_add(d_col)?,
    );
    is_valid(&target, widgets, Some(widget_id), columns)
        .then(|| UpdateRequest::new(widget.id.clone(), WidgetUpdate::position(target)))
}

/// Flip the collapsed flag.
#[must_use]
pub fn toggle_collapsed(widgets: &[Widget], widget_id: &str) -> Option<UpdateRequest> {
    let widget = find_widget(widgets, widget_id)?;
    Some(UpdateRequest::new(
        widget.id.clone(),
        WidgetUpdate {
            collapsed: Some(!widget.collapsed),
            ..WidgetUpdate::default()
        },
    ))
}

/// Change the width preference and re-span the widget to match.
///
/// The new span keeps the widget's row and shifts it left if it would pass
/// the last column. Rejected when the re-spanned rectangle collides with
/// another widget, or when neither preference nor position would change.
#[must_use]
pub fn set_widget_width(
    widgets: &[Widget],
    widget_id: &str,
    widget_width: WidgetWidth,
    columns: u16,
) -> Option<UpdateRequest> {
    let widget = find_widget(widgets, widget_id)?;
    let current = widget.grid_position;
    let span = widget_width.span(columns);
    let max_col = (i32::from(columns.max(1)) - span).max(0);
    let target = GridPosition {
        col: current.col.clamp(0, max_col),
        width: span,
        ..current
    };
    if widget.widget_width == widget_width && target == current {
        return None;
    }
    if !is_valid(&target, widgets, Some(widget_id), columns) {
        return None;
    }
    Some(UpdateRequest::new(
        widget.id.clone(),
        WidgetUpdate {
            grid_position: Some(target),
            widget_width: Some(widget_width),
            collapsed: None,
        },
    ))
}
