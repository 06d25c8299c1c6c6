#![forbid(unsafe_code)]

//! Widget-kind → content renderer lookup.
//!
//! The layout engine treats a widget's `type` as an opaque string. Hosts parse
//! it into a [`WidgetKind`] and resolve a [`WidgetRenderer`] here to paint the
//! widget body and to size newly added widgets.

use std::fmt;

use panelgrid_core::geometry::PxRect;
use panelgrid_layout::Widget;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Known widget content kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetKind {
    Weather,
    Clock,
    Calendar,
    Notes,
    Audio,
    /// Any `type` string not listed above.
    Custom(String),
}

impl WidgetKind {
    /// Parse a widget `type` string. Unknown names become [`WidgetKind::Custom`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "weather" => Self::Weather,
            "clock" => Self::Clock,
            "calendar" => Self::Calendar,
            "notes" => Self::Notes,
            "audio" => Self::Audio,
            other => Self::Custom(other.to_owned()),
        }
    }

    /// The `type` string for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Weather => "weather",
            Self::Clock => "clock",
            Self::Calendar => "calendar",
            Self::Notes => "notes",
            Self::Audio => "audio",
            Self::Custom(name) => name,
        }
    }

    /// Kind of a widget snapshot.
    #[must_use]
    pub fn of(widget: &Widget) -> Self {
        Self::parse(&widget.kind)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for WidgetKind {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<WidgetKind> for String {
    fn from(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Custom(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

/// Paints one widget kind.
pub trait WidgetRenderer {
    /// `(width, height)` in cells for a newly added widget.
    fn default_span(&self) -> (i32, i32) {
        (1, 1)
    }

    /// Produce the widget body for the given container-space bounds.
    fn render(&self, widget: &Widget, bounds: PxRect) -> String;
}

impl<F> WidgetRenderer for F
where
    F: Fn(&Widget, PxRect) -> String,
{
    fn render(&self, widget: &Widget, bounds: PxRect) -> String {
        self(widget, bounds)
    }
}

/// Registration conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    AlreadyRegistered { kind: WidgetKind },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered { kind } => {
                write!(f, "a renderer for widget kind '{kind}' is already registered")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Renderers keyed by [`WidgetKind`], with an optional fallback.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: FxHashMap<WidgetKind, Box<dyn WidgetRenderer>>,
    fallback: Option<Box<dyn WidgetRenderer>>,
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.renderers.keys().map(WidgetKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("RendererRegistry")
            .field("kinds", &kinds)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

impl RendererRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer; each kind may be registered once.
    pub fn register(
        &mut self,
        kind: WidgetKind,
        renderer: impl WidgetRenderer + 'static,
    ) -> Result<(), RegistryError> {
        if self.renderers.contains_key(&kind) {
            return Err(RegistryError::AlreadyRegistered { kind });
        }
        self.renderers.insert(kind, Box::new(renderer));
        Ok(())
    }

    /// Renderer used for kinds with no registration.
    pub fn set_fallback(&mut self, renderer: impl WidgetRenderer + 'static) {
        self.fallback = Some(Box::new(renderer));
    }

    #[must_use]
    pub fn contains(&self, kind: &WidgetKind) -> bool {
        self.renderers.contains_key(kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Resolve a widget `type` string, falling back when unregistered.
    #[must_use]
    pub fn resolve(&self, type_name: &str) -> Option<&dyn WidgetRenderer> {
        self.renderers
            .get(&WidgetKind::parse(type_name))
            .or(self.fallback.as_ref())
            .map(|renderer| &**renderer)
    }

    /// Render a widget, or `None` if nothing handles its kind.
    #[must_use]
    pub fn render(&self, widget: &Widget, bounds: PxRect) -> Option<String> {
        self.resolve(&widget.kind)
            .map(|renderer| renderer.render(widget, bounds))
    }

    /// Default span for a new widget of this kind; `(1, 1)` when unresolved.
    #[must_use]
    pub fn default_span(&self, type_name: &str) -> (i32, i32) {
        self.resolve(type_name)
            .map_or((1, 1), |renderer| renderer.default_span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelgrid_layout::GridPosition;

    struct Weather;

    impl WidgetRenderer for Weather {
        fn default_span(&self) -> (i32, i32) {
            (2, 2)
        }

        fn render(&self, widget: &Widget, bounds: PxRect) -> String {
            format!("weather:{}@{}x{}", widget.id, bounds.width, bounds.height)
        }
    }

    fn widget(kind: &str) -> Widget {
        Widget::new("w1", kind, GridPosition::new(0, 0, 1, 1).unwrap())
    }

    #[test]
    fn kind_parse_round_trip() {
        for name in ["weather", "clock", "calendar", "notes", "audio", "stocks"] {
            assert_eq!(WidgetKind::parse(name).as_str(), name);
        }
        assert_eq!(
            WidgetKind::parse("stocks"),
            WidgetKind::Custom("stocks".into())
        );
        let json = serde_json::to_string(&WidgetKind::Clock).unwrap();
        assert_eq!(json, "\"clock\"");
        let back: WidgetKind = serde_json::from_str("\"notes\"").unwrap();
        assert_eq!(back, WidgetKind::Notes);
    }

    #[test]
    fn register_and_render() {
        let mut registry = RendererRegistry::new();
        registry.register(WidgetKind::Weather, Weather).unwrap();
        registry
            .register(WidgetKind::Clock, |w: &Widget, _: PxRect| format!("clock:{}", w.id))
            .unwrap();

        let rect = PxRect::new(0.0, 0.0, 280.0, 280.0);
        assert_eq!(
            registry.render(&widget("weather"), rect).as_deref(),
            Some("weather:w1@280x280")
        );
        assert_eq!(registry.render(&widget("clock"), rect).as_deref(), Some("clock:w1"));
        assert_eq!(registry.render(&widget("stocks"), rect), None);
        assert_eq!(registry.default_span("weather"), (2, 2));
        assert_eq!(registry.default_span("clock"), (1, 1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = RendererRegistry::new();
        registry.register(WidgetKind::Weather, Weather).unwrap();
        assert_eq!(
            registry.register(WidgetKind::Weather, Weather),
            Err(RegistryError::AlreadyRegistered {
                kind: WidgetKind::Weather
            })
        );
    }

    #[test]
    fn fallback_handles_unknown_kinds() {
        let mut registry = RendererRegistry::new();
        registry.set_fallback(|w: &Widget, _: PxRect| format!("unknown:{}", w.kind));
        let rect = PxRect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            registry.render(&widget("stocks"), rect).as_deref(),
            Some("unknown:stocks")
        );
        assert!(format!("{registry:?}").contains("has_fallback: true"));
    }
}
