#![forbid(unsafe_code)]

//! Coalescing for high-frequency host events.
//!
//! Browsers and compositors can deliver several pointer moves, scroll
//! notifications and resize observations between two animation frames. The
//! engine only needs the latest value of each, so [`EventCoalescer`] keeps:
//!
//! - the most recent pointer move of each pointer id,
//! - the most recent scroll offset / viewport height,
//! - the most recent container width.
//!
//! Everything else (pointer down/up/cancel, keys, focus loss) passes through
//! immediately. The caller is responsible for calling [`EventCoalescer::flush`]
//! before handling a pass-through event so that the engine observes the final
//! pointer position before a release.
//!
//! # Usage
//!
//! ```
//! use panelgrid_core::event::{HostEvent, PointerEvent};
//! use panelgrid_core::event_coalescer::EventCoalescer;
//! use panelgrid_core::geometry::Point;
//!
//! let mut coalescer = EventCoalescer::new();
//! let moved = |x, y| HostEvent::Pointer(PointerEvent::moved(Point::new(x, y)));
//! assert!(coalescer.push(moved(1.0, 1.0)).is_none());
//! assert!(coalescer.push(moved(9.0, 9.0)).is_none());
//!
//! let up = coalescer.push(HostEvent::Pointer(PointerEvent::up(Point::new(9.0, 9.0))));
//! assert!(up.is_some());
//!
//! let pending = coalescer.flush();
//! assert_eq!(pending.len(), 1);
//! ```

use crate::event::{HostEvent, PointerEvent, PointerEventKind};

/// Latest-wins coalescer for pointer moves, scroll and resize.
///
/// Holds one pending move per active pointer plus at most one scroll and one
/// resize. Pointer ids are few, so moves live in a small vector in first-seen
/// order.
#[derive(Debug, Clone, Default)]
pub struct EventCoalescer {
    pending_moves: Vec<PointerEvent>,
    pending_scroll: Option<(f64, f64)>,
    pending_width: Option<f64>,
    coalesced: u64,
}

impl EventCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.
    ///
    /// Returns `Some(event)` for pass-through events and `None` when the event
    /// was absorbed into pending state.
    pub fn push(&mut self, event: HostEvent) -> Option<HostEvent> {
        match event {
            HostEvent::Pointer(pointer) if pointer.kind == PointerEventKind::Moved => {
                match self
                    .pending_moves
                    .iter_mut()
                    .find(|pending| pending.pointer_id == pointer.pointer_id)
                {
                    Some(pending) => {
                        *pending = pointer;
                        self.coalesced += 1;
                    }
                    None => self.pending_moves.push(pointer),
                }
                None
            }
            HostEvent::Scrolled {
                scroll_top,
                viewport_height,
            } => {
                if self
                    .pending_scroll
                    .replace((scroll_top, viewport_height))
                    .is_some()
                {
                    self.coalesced += 1;
                }
                None
            }
            HostEvent::ContainerResized { width } => {
                if self.pending_width.replace(width).is_some() {
                    self.coalesced += 1;
                }
                None
            }
            other => Some(other),
        }
    }

    /// Drain pending events.
    ///
    /// Order is resize, scroll, then pointer moves (first-seen pointer
    /// first): geometry must be current before a pointer position is
    /// converted to a cell.
    pub fn flush(&mut self) -> Vec<HostEvent> {
        let mut out = Vec::with_capacity(2 + self.pending_moves.len());
        if let Some(width) = self.pending_width.take() {
            out.push(HostEvent::ContainerResized { width });
        }
        if let Some((scroll_top, viewport_height)) = self.pending_scroll.take() {
            out.push(HostEvent::Scrolled {
                scroll_top,
                viewport_height,
            });
        }
        out.extend(self.pending_moves.drain(..).map(HostEvent::Pointer));
        out
    }

    /// Whether anything is pending.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending_moves.is_empty()
            || self.pending_scroll.is_some()
            || self.pending_width.is_some()
    }

    /// Total number of events absorbed by a later event of the same kind.
    #[must_use]
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }
}
