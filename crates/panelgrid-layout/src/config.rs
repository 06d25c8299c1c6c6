#![forbid(unsafe_code)]

//! Engine configuration loadable from JSON.
//!
//! Every section is `#[serde(default)]`, so `{}` is a valid document and
//! yields the stock dashboard layout.
//!
//! ```json
//! {
//!   "grid": {
//!     "breakpoints": { "sm": 640, "md": 900, "lg": 1024, "xl": 1200 },
//!     "columns": { "xs": 1, "sm": 2, "lg": 3, "xl": 4 },
//!     "gap_px": 16, "padding_px": 16, "min_cell_px": 40
//!   },
//!   "drag": { "anchor": "top_left" },
//!   "virtualization": { "threshold": 15, "buffer_rows": 1 }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use panelgrid_core::geometry::Insets;

use crate::geometry::DEFAULT_MIN_CELL_PX;
use crate::responsive::Responsive;
use crate::virtualization::VirtualizationConfig;
use crate::{Breakpoint, Breakpoints};

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridSettings,
    pub drag: DragSettings,
    pub virtualization: VirtualizationConfig,
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.virtualization.validate()
    }
}

/// Column map and spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub breakpoints: Breakpoints,
    pub columns: Responsive<u16>,
    /// Gutter between cells.
    pub gap_px: f64,
    /// Container padding; a single number applies to every side.
    pub padding_px: Insets,
    pub min_cell_px: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::DEFAULT,
            columns: Responsive::new(1)
                .at(Breakpoint::Sm, 2)
                .at(Breakpoint::Lg, 3)
                .at(Breakpoint::Xl, 4),
            gap_px: 16.0,
            padding_px: Insets::all(16.0),
            min_cell_px: DEFAULT_MIN_CELL_PX,
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.breakpoints.validate()?;
        for (breakpoint, columns) in self.columns.resolved() {
            if *columns == 0 {
                return Err(ConfigError::ZeroColumns { breakpoint });
            }
        }
        if let Some((lower, upper)) = self.columns.first_decrease() {
            return Err(ConfigError::ColumnsDecrease { lower, upper });
        }
        check_pixels("gap_px", self.gap_px)?;
        for value in self.padding_px.sides() {
            check_pixels("padding_px", value)?;
        }
        check_pixels("min_cell_px", self.min_cell_px)?;
        if self.min_cell_px == 0.0 {
            return Err(ConfigError::InvalidPixels {
                field: "min_cell_px",
                value: self.min_cell_px,
            });
        }
        Ok(())
    }
}

fn check_pixels(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidPixels { field, value })
    }
}

/// Drag behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    pub anchor: DragAnchor,
}

/// How the pointer cell maps to a candidate top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragAnchor {
    /// The pointer cell becomes the widget's top-left cell.
    #[default]
    TopLeft,
    /// Keep the cell offset between pointer and widget origin from drag start.
    GrabOffset,
}

/// Configuration rejected at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse {
        message: String,
    },
    InvalidBreakpoint {
        breakpoint: Breakpoint,
        value: f64,
    },
    BreakpointsNotAscending {
        lower: Breakpoint,
        upper: Breakpoint,
    },
    ZeroColumns {
        breakpoint: Breakpoint,
    },
    ColumnsDecrease {
        lower: Breakpoint,
        upper: Breakpoint,
    },
    InvalidPixels {
        field: &'static str,
        value: f64,
    },
    ZeroBufferRows,
    InvalidItemHeight {
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { message } => write!(f, "config parse error: {message}"),
            Self::InvalidBreakpoint { breakpoint, value } => {
                write!(f, "breakpoint {breakpoint} must be a positive width (got {value})")
            }
            Self::BreakpointsNotAscending { lower, upper } => {
                write!(f, "breakpoint {upper} must be wider than {lower}")
            }
            Self::ZeroColumns { breakpoint } => {
                write!(f, "column count at {breakpoint} must be at least 1")
            }
            Self::ColumnsDecrease { lower, upper } => {
                write!(f, "column count decreases from {lower} to {upper}")
            }
            Self::InvalidPixels { field, value } => {
                write!(f, "{field} must be finite and non-negative (got {value})")
            }
            Self::ZeroBufferRows => f.write_str("virtualization buffer_rows must be at least 1"),
            Self::InvalidItemHeight { value } => {
                write!(f, "virtualization item_height_px must be positive (got {value})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = EngineConfig::from_json_str("{}").expect("valid");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.virtualization.threshold, 15);
        assert_eq!(config.drag.anchor, DragAnchor::TopLeft);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"grid": {"gap_px": 8}, "drag": {"anchor": "grab_offset"}}"#,
        )
        .expect("valid");
        assert_eq!(config.grid.gap_px, 8.0);
        assert_eq!(config.grid.padding_px, Insets::all(16.0));
        assert_eq!(config.drag.anchor, DragAnchor::GrabOffset);
    }

    #[test]
    fn padding_accepts_per_side_object() {
        let config = EngineConfig::from_json_str(
            r#"{"grid": {"padding_px": {"top": 8, "right": 0, "bottom": 8, "left": 24}}}"#,
        )
        .expect("valid");
        assert_eq!(config.grid.padding_px.horizontal_sum(), 24.0);
        assert_eq!(config.grid.padding_px.top, 8.0);

        let err = EngineConfig::from_json_str(r#"{"grid": {"padding_px": {"left": -1}}}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPixels {
                field: "padding_px",
                value: -1.0
            }
        );
    }

    #[test]
    fn json_round_trip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(EngineConfig::from_json_str(&json), Ok(config));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{\"grid\": 3}"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_zero_columns() {
        let err = EngineConfig::from_json_str(r#"{"grid": {"columns": {"xs": 0, "sm": 2}}}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ZeroColumns {
                breakpoint: Breakpoint::Xs
            }
        );
    }

    #[test]
    fn rejects_decreasing_columns() {
        let err = EngineConfig::from_json_str(
            r#"{"grid": {"columns": {"xs": 1, "md": 4, "xl": 3}}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ColumnsDecrease {
                lower: Breakpoint::Lg,
                upper: Breakpoint::Xl
            }
        );
    }

    #[test]
    fn rejects_bad_pixels() {
        let mut settings = GridSettings::default();
        settings.gap_px = -1.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidPixels { field: "gap_px", .. })
        ));
        settings.gap_px = 16.0;
        settings.min_cell_px = f64::NAN;
        assert!(settings.validate().is_err());
        settings.min_cell_px = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_zero_buffer_rows() {
        let err = EngineConfig::from_json_str(r#"{"virtualization": {"buffer_rows": 0}}"#)
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroBufferRows);
        assert_eq!(
            err.to_string(),
            "virtualization buffer_rows must be at least 1"
        );
    }
}
