#![forbid(unsafe_code)]

//! Pixel-space geometric primitives.
//!
//! Hosts report pointer positions and container sizes in CSS-style pixels.
//! These types carry those numbers into the engine without any notion of the
//! platform that produced them.

use serde::{Deserialize, Serialize};

/// A point in pixel space (origin at top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Whether both coordinates are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PxRect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PxRect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Translate the rectangle by an origin offset.
    #[inline]
    #[must_use]
    pub fn translate(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    /// Shrink the rectangle by the given insets, saturating at zero size.
    #[must_use]
    pub fn inner(&self, insets: Insets) -> PxRect {
        PxRect {
            x: self.x + insets.left,
            y: self.y + insets.top,
            width: (self.width - insets.horizontal_sum()).max(0.0),
            height: (self.height - insets.vertical_sum()).max(0.0),
        }
    }
}

/// Container padding, per side.
///
/// Deserializes from either one number (every side) or a
/// `{ "top", "right", "bottom", "left" }` object; missing sides are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "InsetsRepr")]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    /// Equal insets on every side.
    #[must_use]
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Sum of left and right.
    #[inline]
    #[must_use]
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    #[must_use]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }

    /// Sides in `top, right, bottom, left` order.
    #[must_use]
    pub const fn sides(&self) -> [f64; 4] {
        [self.top, self.right, self.bottom, self.left]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InsetsRepr {
    Uniform(f64),
    Sides {
        #[serde(default)]
        top: f64,
        #[serde(default)]
        right: f64,
        #[serde(default)]
        bottom: f64,
        #[serde(default)]
        left: f64,
    },
}

impl From<InsetsRepr> for Insets {
    fn from(repr: InsetsRepr) -> Self {
        match repr {
            InsetsRepr::Uniform(val) => Self::all(val),
            InsetsRepr::Sides {
                top,
                right,
                bottom,
                left,
            } => Self {
                top,
                right,
                bottom,
                left,
            },
        }
    }
}
