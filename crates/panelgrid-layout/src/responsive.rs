#![forbid(unsafe_code)]

//! Breakpoint-keyed values with inheritance from smaller tiers.
//!
//! [`Responsive<T>`] stores a base value for `Xs` and an optional value per
//! larger [`Breakpoint`]. A tier with no explicit value inherits the value of
//! the nearest smaller tier, so the column map `xs: 1, sm: 2, xl: 4` resolves `md` and `lg` to `2`.
//!
//! # Invariants
//!
//! 1. `Xs` always has a value (set via `new()`, required when deserializing).
//! 2. A missing tier resolves to the nearest smaller explicit tier.
//! 3. `resolve()` never fails.
//!
//! # Serialized form
//!
//! ```json
//! { "xs": 1, "sm": 2, "xl": 4 }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Breakpoint;

/// A breakpoint-aware value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responsive<T> {
    base: T,
    /// `Sm` through `Xl`, indexed by `Breakpoint` ordinal minus one.
    overrides: [Option<T>; 4],
}

impl<T: Clone> Responsive<T> {
    /// Create a responsive value with a base value for `Xs`.
    #[must_use]
    pub fn new(base: T) -> Self {
        Self {
            base,
            overrides: [None, None, None, None],
        }
    }

    /// Set the value for a breakpoint (builder form).
    #[must_use]
    pub fn at(mut self, bp: Breakpoint, value: T) -> Self {
        self.set(bp, value);
        self
    }

    /// Set the value for a breakpoint.
    pub fn set(&mut self, bp: Breakpoint, value: T) {
        match bp as usize {
            0 => self.base = value,
            idx => self.overrides[idx - 1] = Some(value),
        }
    }

    /// Resolve the value for a breakpoint, walking down to `Xs`.
    #[must_use]
    pub fn resolve(&self, bp: Breakpoint) -> &T {
        self.overrides[..bp as usize]
            .iter()
            .rev()
            .find_map(Option::as_ref)
            .unwrap_or(&self.base)
    }

    /// Whether a breakpoint carries an explicit value.
    #[must_use]
    pub fn has_explicit(&self, bp: Breakpoint) -> bool {
        match bp as usize {
            0 => true,
            idx => self.overrides[idx - 1].is_some(),
        }
    }

    /// Resolved values for every tier, ascending.
    pub fn resolved(&self) -> impl Iterator<Item = (Breakpoint, &T)> {
        Breakpoint::ALL.into_iter().map(|bp| (bp, self.resolve(bp)))
    }
}

impl<T: Clone + PartialOrd> Responsive<T> {
    /// First adjacent pair of tiers whose resolved values decrease.
    #[must_use]
    pub fn first_decrease(&self) -> Option<(Breakpoint, Breakpoint)> {
        Breakpoint::ALL.windows(2).find_map(|pair| {
            (self.resolve(pair[1]) < self.resolve(pair[0])).then_some((pair[0], pair[1]))
        })
    }
}

impl<T: Clone + Default> Default for Responsive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[derive(Serialize, Deserialize)]
struct ResponsiveRepr<T> {
    xs: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    sm: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    md: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lg: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    xl: Option<T>,
}

impl<T: Clone + Serialize> Serialize for Responsive<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let [sm, md, lg, xl] = self.overrides.clone();
        ResponsiveRepr {
            xs: self.base.clone(),
            sm,
            md,
            lg,
            xl,
        }
        .serialize(serializer)
    }
}

impl<'de, T: Clone + Deserialize<'de>> Deserialize<'de> for Responsive<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = ResponsiveRepr::<T>::deserialize(deserializer)?;
        Ok(Self {
            base: repr.xs,
            overrides: [repr.sm, repr.md, repr.lg, repr.xl],
        })
    }
}
