#![forbid(unsafe_code)]

//! Widget snapshot records and mutation requests.
//!
//! The external widget store is the system of record. The engine reads
//! [`Widget`] snapshots and answers with [`UpdateRequest`]s delivered through
//! an [`UpdateSink`]; it never edits a widget in place.
//!
//! Field names serialize in camelCase to match the store's wire shape
//! (`gridPosition`, `widgetWidth`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A widget's rectangle in grid-cell units.
///
/// `[col, col + width) × [row, row + height)`. Positions are replaced
/// wholesale on commit, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: i32,
    pub col: i32,
    pub width: i32,
    pub height: i32,
}

impl GridPosition {
    /// Create a position, rejecting zero or negative spans.
    pub fn new(row: i32, col: i32, width: i32, height: i32) -> Result<Self, ModelError> {
        if width < 1 || height < 1 {
            return Err(ModelError::InvalidSpan { width, height });
        }
        Ok(Self {
            row,
            col,
            width,
            height,
        })
    }

    /// Exclusive right edge (`col + width`), widened to avoid overflow.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i64 {
        self.col as i64 + self.width as i64
    }

    /// Exclusive bottom edge (`row + height`), widened to avoid overflow.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.row as i64 + self.height as i64
    }

    /// Same span, different top-left cell.
    #[inline]
    #[must_use]
    pub const fn moved_to(self, row: i32, col: i32) -> Self {
        Self { row, col, ..self }
    }

    /// Same top-left cell, different span.
    #[inline]
    #[must_use]
    pub const fn resized_to(self, width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    /// Whether the cell `(row, col)` lies inside this rectangle.
    #[inline]
    #[must_use]
    pub const fn covers(&self, row: i32, col: i32) -> bool {
        row >= self.row
            && (row as i64) < self.bottom()
            && col >= self.col
            && (col as i64) < self.right()
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r{}c{} {}x{}",
            self.row, self.col, self.width, self.height
        )
    }
}

/// Layout width preference chosen in widget settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetWidth {
    #[default]
    Half,
    Full,
}

impl WidgetWidth {
    /// Column span for this preference at the given column count.
    ///
    /// `Full` spans every column; `Half` spans half (rounded down, at least 1).
    #[must_use]
    pub fn span(self, columns: u16) -> i32 {
        let columns = i32::from(columns.max(1));
        match self {
            Self::Full => columns,
            Self::Half => (columns / 2).max(1),
        }
    }
}

/// One panel as seen in a store snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    /// Opaque content kind; only the renderer registry interprets it.
    #[serde(rename = "type")]
    pub kind: String,
    pub grid_position: GridPosition,
    #[serde(default)]
    pub widget_width: WidgetWidth,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub order: i32,
}

impl Widget {
    /// Create an expanded, half-width widget.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        grid_position: GridPosition,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            grid_position,
            widget_width: WidgetWidth::Half,
            collapsed: false,
            order: 0,
        }
    }

    /// Set the ordering key.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Set the width preference.
    #[must_use]
    pub fn with_widget_width(mut self, widget_width: WidgetWidth) -> Self {
        self.widget_width = widget_width;
        self
    }
}

/// Find a widget in a snapshot by id.
#[must_use]
pub fn find_widget<'a>(widgets: &'a [Widget], id: &str) -> Option<&'a Widget> {
    widgets.iter().find(|w| w.id == id)
}

/// Partial mutation: only the fields that are `Some` change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_position: Option<GridPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_width: Option<WidgetWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl WidgetUpdate {
    /// Update carrying only a new position.
    #[must_use]
    pub const fn position(grid_position: GridPosition) -> Self {
        Self {
            grid_position: Some(grid_position),
            widget_width: None,
            collapsed: None,
        }
    }

    /// Whether no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.grid_position.is_none() && self.widget_width.is_none() && self.collapsed.is_none()
    }

    /// Apply this update to a widget copy (used by hosts that mirror the store).
    pub fn apply_to(&self, widget: &mut Widget) {
        if let Some(position) = self.grid_position {
            widget.grid_position = position;
        }
        if let Some(width) = self.widget_width {
            widget.widget_width = width;
        }
        if let Some(collapsed) = self.collapsed {
            widget.collapsed = collapsed;
        }
    }
}

/// A mutation request addressed to the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub widget_id: String,
    pub update: WidgetUpdate,
}

impl UpdateRequest {
    /// Create a request.
    #[must_use]
    pub fn new(widget_id: impl Into<String>, update: WidgetUpdate) -> Self {
        Self {
            widget_id: widget_id.into(),
            update,
        }
    }

    /// Hand the request to a sink.
    pub fn dispatch(&self, sink: &mut dyn UpdateSink) {
        sink.request_update(&self.widget_id, self.update);
    }
}

/// Outbound port to the widget store.
///
/// Delivery is fire-and-forget: the engine does not wait for persistence.
/// A store that later rejects a change pushes a corrective snapshot instead.
pub trait UpdateSink {
    fn request_update(&mut self, widget_id: &str, update: WidgetUpdate);
}

impl UpdateSink for Vec<UpdateRequest> {
    fn request_update(&mut self, widget_id: &str, update: WidgetUpdate) {
        self.push(UpdateRequest::new(widget_id, update));
    }
}

/// Errors constructing model values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    InvalidSpan { width: i32, height: i32 },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpan { width, height } => {
                write!(f, "grid span must be at least 1x1 (got {width}x{height})")
            }
        }
    }
}

impl std::error::Error for ModelError {}
