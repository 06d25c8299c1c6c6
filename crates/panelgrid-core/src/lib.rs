#![forbid(unsafe_code)]

//! Core: pixel geometry and host input events for the panelgrid engine.
//!
//! # Role in panelgrid
//! `panelgrid-core` is the input-port layer. Hosts (a web view, a native
//! window, a test harness) measure their container and translate platform
//! events into the plain-number types defined here. The layout engine in
//! `panelgrid-layout` consumes nothing else from the outside world.
//!
//! # Primary responsibilities
//! - **Geometry**: `Point`, `PxRect` and `Insets` in pixel space.
//! - **Event**: canonical `HostEvent` values (pointer, key, resize, scroll).
//! - **Coalescing**: latest-wins batching of per-frame event floods.

pub mod event;
pub mod event_coalescer;
pub mod geometry;

pub use event::{
    HandleKind, HandleTarget, HostEvent, KeyCode, KeyEvent, Modifiers, PointerEvent,
    PointerEventKind,
};
pub use event_coalescer::EventCoalescer;
pub use geometry::{Insets, Point, PxRect};
