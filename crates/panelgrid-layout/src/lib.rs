#![forbid(unsafe_code)]

//! Grid layout and drag-positioning engine.
//!
//! # Role in panelgrid
//! This crate turns container metrics and pointer positions (plain numbers
//! from `panelgrid-core`) into grid geometry, placement verdicts, drag
//! lifecycle transitions, visible-range windows and overlay classifications.
//! It never owns the canonical widget list: every operation receives a
//! snapshot and returns proposed mutations.
//!
//! # Modules
//! - [`geometry`]: breakpoint columns, cell size, pixel↔cell conversion.
//! - [`placement`]: bounds and overlap checks, first-fit auto placement.
//! - [`drag`]: the drag/resize state machine.
//! - [`virtualization`]: scroll windowing with spacer sizes.
//! - [`overlay`]: per-cell highlight classification.
//! - [`reconcile`]: invariant audit and corrective updates for snapshots.
//! - [`actions`]: discrete widget actions (nudge, collapse, width toggle).
//! - [`config`]: serde-loadable engine configuration.

pub mod actions;
pub mod config;
pub mod drag;
pub mod geometry;
pub mod model;
pub mod overlay;
pub mod placement;
pub mod reconcile;
pub mod responsive;
pub mod virtualization;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use actions::{NudgeDirection, nudge, set_widget_width, toggle_collapsed};
pub use config::{ConfigError, DragAnchor, DragSettings, EngineConfig, GridSettings};
pub use drag::{
    CancelReason, DragCoordinator, DragEffect, DragKind, DragNoopReason, DragPhase, DragSession,
    DragTransition, RevertReason,
};
pub use geometry::{
    DEFAULT_MIN_CELL_PX, GridCell, GridConfig, cell_size, cell_to_pixel_rect, columns_for,
    pixel_to_cell,
};
pub use model::{
    GridPosition, ModelError, UpdateRequest, UpdateSink, Widget, WidgetUpdate, WidgetWidth,
    find_widget,
};
pub use overlay::{CellState, GridOverlay, OverlayCell};
pub use placement::{first_free_position, in_bounds, intersects, is_valid};
pub use reconcile::{ReconcileReport, Violation, ViolationKind, audit, reconcile};
pub use responsive::Responsive;
pub use virtualization::{
    ScrollMetrics, VirtualizationConfig, VisibleWindow, WindowMode, compute_window,
};

pub use panelgrid_core::geometry::{Insets, Point, PxRect};

/// Width tiers used to pick a column count.
///
/// Ordered smallest to largest; the ordinal indexes [`Responsive`] slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Xs = 0,
    Sm = 1,
    Md = 2,
    Lg = 3,
    Xl = 4,
}

impl Breakpoint {
    /// All tiers in ascending order.
    pub const ALL: [Breakpoint; 5] = [Self::Xs, Self::Sm, Self::Md, Self::Lg, Self::Xl];

    /// Short lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Minimum container widths (pixels) at which each tier above `Xs` begins.
///
/// A width `w` classifies as the largest tier whose threshold is `<= w`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub sm: f64,
    pub md: f64,
    pub lg: f64,
    pub xl: f64,
}

impl Breakpoints {
    /// Default thresholds: 640 / 900 / 1024 / 1200.
    pub const DEFAULT: Self = Self {
        sm: 640.0,
        md: 900.0,
        lg: 1024.0,
        xl: 1200.0,
    };

    /// Create thresholds, rejecting non-finite or non-ascending values.
    pub fn new(sm: f64, md: f64, lg: f64, xl: f64) -> Result<Self, ConfigError> {
        let bp = Self { sm, md, lg, xl };
        bp.validate()?;
        Ok(bp)
    }

    /// Check that thresholds are finite, positive and strictly ascending.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = self.thresholds();
        for (bp, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidBreakpoint {
                    breakpoint: bp,
                    value,
                });
            }
        }
        for pair in values.windows(2) {
            let (lower_bp, lower) = pair[0];
            let (upper_bp, upper) = pair[1];
            if upper <= lower {
                return Err(ConfigError::BreakpointsNotAscending {
                    lower: lower_bp,
                    upper: upper_bp,
                });
            }
        }
        Ok(())
    }

    /// Threshold for each tier above `Xs`, ascending.
    #[must_use]
    pub fn thresholds(&self) -> [(Breakpoint, f64); 4] {
        [
            (Breakpoint::Sm, self.sm),
            (Breakpoint::Md, self.md),
            (Breakpoint::Lg, self.lg),
            (Breakpoint::Xl, self.xl),
        ]
    }

    /// Classify a container width. Non-finite or negative widths are `Xs`.
    #[must_use]
    pub fn classify(&self, width_px: f64) -> Breakpoint {
        if !width_px.is_finite() {
            return Breakpoint::Xs;
        }
        let mut tier = Breakpoint::Xs;
        for (bp, threshold) in self.thresholds() {
            if width_px >= threshold {
                tier = bp;
            }
        }
        tier
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_default_thresholds() {
        let bp = Breakpoints::default();
        assert_eq!(bp.classify(0.0), Breakpoint::Xs);
        assert_eq!(bp.classify(639.9), Breakpoint::Xs);
        assert_eq!(bp.classify(640.0), Breakpoint::Sm);
        assert_eq!(bp.classify(899.0), Breakpoint::Sm);
        assert_eq!(bp.classify(900.0), Breakpoint::Md);
        assert_eq!(bp.classify(1024.0), Breakpoint::Lg);
        assert_eq!(bp.classify(1199.0), Breakpoint::Lg);
        assert_eq!(bp.classify(1200.0), Breakpoint::Xl);
        assert_eq!(bp.classify(4000.0), Breakpoint::Xl);
    }

    #[test]
    fn classify_degenerate_widths() {
        let bp = Breakpoints::default();
        assert_eq!(bp.classify(-50.0), Breakpoint::Xs);
        assert_eq!(bp.classify(f64::NAN), Breakpoint::Xs);
        assert_eq!(bp.classify(f64::INFINITY), Breakpoint::Xs);
    }

    #[test]
    fn new_rejects_non_ascending() {
        let err = Breakpoints::new(640.0, 600.0, 1024.0, 1200.0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::BreakpointsNotAscending {
                lower: Breakpoint::Sm,
                upper: Breakpoint::Md,
            }
        );
    }

    #[test]
    fn new_rejects_non_positive() {
        assert!(matches!(
            Breakpoints::new(0.0, 600.0, 1024.0, 1200.0),
            Err(ConfigError::InvalidBreakpoint {
                breakpoint: Breakpoint::Sm,
                ..
            })
        ));
    }

    #[test]
    fn breakpoint_ordering_and_labels() {
        assert!(Breakpoint::Xs < Breakpoint::Xl);
        assert_eq!(Breakpoint::Md.to_string(), "md");
        assert_eq!(Breakpoint::ALL.len(), 5);
    }
}
