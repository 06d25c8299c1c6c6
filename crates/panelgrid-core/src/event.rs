#![forbid(unsafe_code)]

//! Canonical host input events.
//!
//! The engine never observes a DOM, a window system or a terminal. A thin
//! host adapter translates whatever the platform produces into [`HostEvent`]
//! values carrying plain numbers: pointer coordinates, container width,
//! scroll offset and viewport height.
//!
//! Hit testing is the host's job: a pointer-down that lands on a widget's
//! drag or resize handle arrives with a [`HandleTarget`] attached.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Canonical input event consumed by the grid engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// A pointer (mouse, pen, touch) event.
    Pointer(PointerEvent),

    /// A keyboard event.
    Key(KeyEvent),

    /// The grid container was measured with a new width.
    ContainerResized {
        /// Outer container width in pixels.
        width: f64,
    },

    /// The scroll viewport moved or changed height.
    Scrolled {
        /// Scroll offset from the top of the content, in pixels.
        scroll_top: f64,
        /// Visible viewport height in pixels.
        viewport_height: f64,
    },

    /// The host window lost focus.
    FocusLost,
}

impl HostEvent {
    /// Whether this event is a pointer move.
    #[must_use]
    pub fn is_pointer_move(&self) -> bool {
        matches!(
            self,
            Self::Pointer(PointerEvent {
                kind: PointerEventKind::Moved,
                ..
            })
        )
    }
}

/// Which part of a widget chrome received the pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    /// The title-bar drag handle: moves the widget.
    Move,
    /// The bottom-right resize grip: changes width/height.
    ResizeCorner,
}

/// Hit-test result attached to a pointer-down.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleTarget {
    pub widget_id: String,
    pub handle: HandleKind,
}

impl HandleTarget {
    /// Create a handle target.
    #[must_use]
    pub fn new(widget_id: impl Into<String>, handle: HandleKind) -> Self {
        Self {
            widget_id: widget_id.into(),
            handle,
        }
    }
}

/// Pointer event phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Button pressed. `target` is `None` when nothing draggable was hit.
    Down { target: Option<HandleTarget> },
    /// Pointer moved (with or without a button held).
    Moved,
    /// Button released.
    Up,
    /// The platform aborted the pointer stream (e.g. `pointercancel`).
    Cancel,
}

/// A pointer event in container-relative pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
    /// Stable identifier of the pointer that produced the event.
    pub pointer_id: u32,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a pointer event for the primary pointer.
    #[must_use]
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            kind,
            position,
            pointer_id: 0,
            modifiers: Modifiers::NONE,
        }
    }

    /// Pointer-down on a widget handle.
    #[must_use]
    pub fn down_on(target: HandleTarget, position: Point) -> Self {
        Self::new(
            PointerEventKind::Down {
                target: Some(target),
            },
            position,
        )
    }

    /// Pointer move.
    #[must_use]
    pub fn moved(position: Point) -> Self {
        Self::new(PointerEventKind::Moved, position)
    }

    /// Pointer release.
    #[must_use]
    pub fn up(position: Point) -> Self {
        Self::new(PointerEventKind::Up, position)
    }

    /// Set the pointer id.
    #[must_use]
    pub fn with_pointer_id(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    /// Set the modifier snapshot.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub code: KeyCode,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event without modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Whether this is a plain Escape press.
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.code == KeyCode::Escape
    }
}

/// Keys the engine reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Escape,
    Up,
    Down,
    Left,
    Right,
    Char(char),
    Other,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_move_detection() {
        let moved = HostEvent::Pointer(PointerEvent::moved(Point::new(1.0, 2.0)));
        let up = HostEvent::Pointer(PointerEvent::up(Point::new(1.0, 2.0)));
        assert!(moved.is_pointer_move());
        assert!(!up.is_pointer_move());
        assert!(!HostEvent::FocusLost.is_pointer_move());
    }

    #[test]
    fn down_on_carries_target() {
        let event = PointerEvent::down_on(
            HandleTarget::new("weather-1", HandleKind::Move),
            Point::new(5.0, 5.0),
        )
        .with_pointer_id(7);
        assert_eq!(event.pointer_id, 7);
        match event.kind {
            PointerEventKind::Down { target: Some(t) } => {
                assert_eq!(t.widget_id, "weather-1");
                assert_eq!(t.handle, HandleKind::Move);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn escape_detection() {
        assert!(KeyEvent::new(KeyCode::Escape).is_escape());
        assert!(!KeyEvent::new(KeyCode::Char('q')).is_escape());
    }

    #[test]
    fn host_event_json_shape() {
        let event = HostEvent::ContainerResized { width: 1200.0 };
        let json = serde_json::to_string(&event).expect("serialize");
        assert_eq!(json, r#"{"event":"container_resized","width":1200.0}"#);
        let back: HostEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn modifiers_default_is_none() {
        let json = r#"{"code":"escape"}"#;
        let key: KeyEvent = serde_json::from_str(json).expect("deserialize");
        assert_eq!(key.modifiers, Modifiers::NONE);
    }
}
