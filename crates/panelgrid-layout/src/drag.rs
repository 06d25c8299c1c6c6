#![forbid(unsafe_code)]

//! Drag lifecycle state machine for moving and resizing widgets.
//!
//! ```text
//! Idle -> Dragging -> Hovering* -> Committing -> Idle
//!                               \-> Reverting  -> Idle
//!           \------------------------> Reverting -> Idle (end without hover, cancel)
//! ```
//!
//! `Committing` and `Reverting` are pass-through phases: the step that enters
//! them also settles back to `Idle`, and the returned [`DragTransition`]
//! records the phase it went through.
//!
//! # Invariants
//!
//! 1. At most one [`DragSession`] exists; `begin` while active is a no-op.
//! 2. A move never emits a mutation; only `end` with a valid hover does, and
//!    it emits exactly one [`UpdateRequest`].
//! 3. The dragged widget is excluded from its own overlap check.
//! 4. `cancel` always reverts, whatever the current hover validity.
//! 5. After a grid change, `revalidate` recomputes `is_valid` for the existing
//!    hover against the new column count.
//!
//! # Failure Modes
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | Unknown widget id at `begin` | `Noop(UnknownWidget)` |
//! | Dragged widget vanished from a snapshot | `Reverted(Canceled(TargetRemoved))` |
//! | Drop on invalid cell | `Reverted(InvalidDrop)`, no mutation |
//! | Events from a second pointer | `Noop(PointerMismatch)` |

use panelgrid_core::geometry::Point;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::DragAnchor;
use crate::geometry::{GridCell, GridConfig};
use crate::model::{GridPosition, UpdateRequest, Widget, WidgetUpdate, find_widget};
use crate::placement::is_valid;

/// Observable lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    Dragging,
    Hovering,
    Committing,
    Reverting,
}

/// What the gesture changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    /// Title-bar drag: row/col follow the pointer, span is preserved.
    Move,
    /// Corner drag: row/col are preserved, span follows the pointer.
    Resize,
}

/// Why a drag was abandoned explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    EscapeKey,
    PointerCancel,
    FocusLost,
    TargetRemoved,
    Programmatic,
}

/// Why a drag ended without a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", content = "cancel", rename_all = "snake_case")]
pub enum RevertReason {
    /// The last hover position failed validation.
    InvalidDrop,
    /// The pointer was released before any hover was computed.
    NoHover,
    /// The widget was dropped where it started.
    Unchanged,
    Canceled(CancelReason),
}

/// Events that were safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    UnknownWidget,
    PointerMismatch,
    NonFinitePointer,
}

/// Live state of the one active drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub active_widget_id: String,
    pub kind: DragKind,
    pub pointer_id: u32,
    /// Position before the drag began; restored on revert.
    pub origin_position: GridPosition,
    /// Pointer cell minus widget top-left at drag start (zero for top-left anchoring).
    pub grab_offset: GridCell,
    pub hover_position: Option<GridPosition>,
    pub is_valid: bool,
    /// Move events applied to this session.
    pub moves: u64,
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Dragging(DragSession),
    Hovering(DragSession),
}

impl DragState {
    fn phase(&self) -> DragPhase {
        match self {
            Self::Idle => DragPhase::Idle,
            Self::Dragging(_) => DragPhase::Dragging,
            Self::Hovering(_) => DragPhase::Hovering,
        }
    }
}

/// Effect produced by one lifecycle step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Started {
        widget_id: String,
        kind: DragKind,
        origin: GridPosition,
    },
    /// Hover feedback. Carries no id so per-frame moves stay allocation free.
    Hovered {
        hover: GridPosition,
        is_valid: bool,
        /// Whether `hover` or `is_valid` differ from the previous step.
        changed: bool,
    },
    Committed {
        request: UpdateRequest,
    },
    Reverted {
        widget_id: String,
        restore: GridPosition,
        reason: RevertReason,
    },
    Noop {
        reason: DragNoopReason,
    },
}

impl DragEffect {
    /// The mutation request, if this effect is a commit.
    #[must_use]
    pub fn commit_request(&self) -> Option<&UpdateRequest> {
        match self {
            Self::Committed { request } => Some(request),
            _ => None,
        }
    }
}

/// One state-machine step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragPhase,
    /// Pass-through phase (`Committing` or `Reverting`) when the step ended a drag.
    pub through: Option<DragPhase>,
    pub to: DragPhase,
    pub effect: DragEffect,
}

/// Drives pointer drags against widget snapshots.
///
/// Holds no widget list of its own: each call receives the current snapshot
/// and grid metrics.
#[derive(Debug, Clone)]
pub struct DragCoordinator {
    state: DragState,
    anchor: DragAnchor,
    transition_counter: u64,
}

impl Default for DragCoordinator {
    fn default() -> Self {
        Self::new(DragAnchor::default())
    }
}

impl DragCoordinator {
    #[must_use]
    pub fn new(anchor: DragAnchor) -> Self {
        Self {
            state: DragState::Idle,
            anchor,
            transition_counter: 0,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.state.phase()
    }

    /// Whether a session is live.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// The live session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(session) | DragState::Hovering(session) => Some(session),
        }
    }

    /// Hover position and validity for overlay rendering.
    #[must_use]
    pub fn hover(&self) -> Option<(GridPosition, bool)> {
        let session = self.session()?;
        session.hover_position.map(|p| (p, session.is_valid))
    }

    /// Number of transitions emitted so far.
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.transition_counter
    }

    /// Idle → Dragging on a pointer-down over a widget handle.
    pub fn begin(
        &mut self,
        widget_id: &str,
        kind: DragKind,
        pointer: Point,
        pointer_id: u32,
        widgets: &[Widget],
        grid: &GridConfig,
    ) -> DragTransition {
        let from = self.phase();
        if self.is_active() {
            return self.noop(DragNoopReason::ActiveDragAlreadyInProgress);
        }
        let Some(widget) = find_widget(widgets, widget_id) else {
            debug!(
                target: "panelgrid::drag",
                widget_id,
                "drag start ignored: widget not in snapshot"
            );
            return self.noop(DragNoopReason::UnknownWidget);
        };
        if !pointer.is_finite() {
            return self.noop(DragNoopReason::NonFinitePointer);
        }

        let origin = widget.grid_position;
        let grab_offset = match (self.anchor, kind) {
            (DragAnchor::GrabOffset, DragKind::Move) => {
                let cell = grid.pixel_to_cell(pointer);
                GridCell::new(
                    cell.row.saturating_sub(origin.row),
                    cell.col.saturating_sub(origin.col),
                )
            }
            _ => GridCell::default(),
        };

        debug!(
            target: "panelgrid::drag",
            widget_id,
            ?kind,
            pointer_id,
            origin = %origin,
            "drag started"
        );
        self.state = DragState::Dragging(DragSession {
            active_widget_id: widget.id.clone(),
            kind,
            pointer_id,
            origin_position: origin,
            grab_offset,
            hover_position: None,
            is_valid: false,
            moves: 0,
        });
        self.transition(
            from,
            None,
            DragEffect::Started {
                widget_id: widget.id.clone(),
                kind,
                origin,
            },
        )
    }

    /// Dragging/Hovering → Hovering on a pointer move.
    ///
    /// Computes the candidate for the pointer cell and validates it against
    /// the snapshot. Never emits a mutation.
    pub fn pointer_move(
        &mut self,
        pointer: Point,
        pointer_id: u32,
        widgets: &[Widget],
        grid: &GridConfig,
    ) -> DragTransition {
        let from = self.phase();
        let session = match &mut self.state {
            DragState::Idle => return self.noop(DragNoopReason::IdleWithoutActiveDrag),
            DragState::Dragging(session) | DragState::Hovering(session) => session,
        };
        if session.pointer_id != pointer_id {
            return self.noop(DragNoopReason::PointerMismatch);
        }
        if !pointer.is_finite() {
            return self.noop(DragNoopReason::NonFinitePointer);
        }
        let Some(current) = find_widget(widgets, &session.active_widget_id) else {
            return self.cancel(CancelReason::TargetRemoved);
        };

        let cell = grid.pixel_to_cell(pointer);
        let candidate = candidate_for(session, current.grid_position, cell);
        let is_valid = is_valid(
            &candidate,
            widgets,
            Some(session.active_widget_id.as_str()),
            grid.columns,
        );
        let changed = session.hover_position != Some(candidate) || session.is_valid != is_valid;
        session.hover_position = Some(candidate);
        session.is_valid = is_valid;
        session.moves = session.moves.saturating_add(1);

        trace!(
            target: "panelgrid::drag",
            row = candidate.row,
            col = candidate.col,
            width = candidate.width,
            height = candidate.height,
            is_valid,
            changed,
            "hover"
        );

        self.state = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging(session) => DragState::Hovering(session),
            other => other,
        };
        self.transition(
            from,
            None,
            DragEffect::Hovered {
                hover: candidate,
                is_valid,
                changed,
            },
        )
    }

    /// Hovering → Committing/Reverting → Idle on pointer release.
    ///
    /// The last hover is validated once more against `widgets`; only a valid,
    /// changed position yields a commit.
    pub fn end(
        &mut self,
        pointer_id: u32,
        widgets: &[Widget],
        grid: &GridConfig,
    ) -> DragTransition {
        let from = self.phase();
        let session = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging(session) | DragState::Hovering(session)
                if session.pointer_id == pointer_id =>
            {
                session
            }
            DragState::Idle => return self.noop(DragNoopReason::IdleWithoutActiveDrag),
            other => {
                self.state = other;
                return self.noop(DragNoopReason::PointerMismatch);
            }
        };

        if find_widget(widgets, &session.active_widget_id).is_none() {
            return self.revert(from, session, RevertReason::Canceled(CancelReason::TargetRemoved));
        }
        let Some(hover) = session.hover_position else {
            return self.revert(from, session, RevertReason::NoHover);
        };
        if hover == session.origin_position {
            return self.revert(from, session, RevertReason::Unchanged);
        }
        if !is_valid(
            &hover,
            widgets,
            Some(session.active_widget_id.as_str()),
            grid.columns,
        ) {
            return self.revert(from, session, RevertReason::InvalidDrop);
        }

        debug!(
            target: "panelgrid::drag",
            widget_id = %session.active_widget_id,
            from = %session.origin_position,
            to = %hover,
            moves = session.moves,
            "drag committed"
        );
        let request = UpdateRequest::new(session.active_widget_id, WidgetUpdate::position(hover));
        self.transition(
            from,
            Some(DragPhase::Committing),
            DragEffect::Committed { request },
        )
    }

    /// Any active phase → Reverting → Idle, regardless of validity.
    pub fn cancel(&mut self, reason: CancelReason) -> DragTransition {
        let from = self.phase();
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => self.noop(DragNoopReason::IdleWithoutActiveDrag),
            DragState::Dragging(session) | DragState::Hovering(session) => {
                self.revert(from, session, RevertReason::Canceled(reason))
            }
        }
    }

    /// Re-check the live hover after the grid or snapshot changed.
    ///
    /// Returns `None` when idle or when no hover has been computed yet and the
    /// dragged widget is still present.
    pub fn revalidate(&mut self, widgets: &[Widget], grid: &GridConfig) -> Option<DragTransition> {
        let from = self.phase();
        let session = match &mut self.state {
            DragState::Idle => return None,
            DragState::Dragging(session) | DragState::Hovering(session) => session,
        };
        if find_widget(widgets, &session.active_widget_id).is_none() {
            return Some(self.cancel(CancelReason::TargetRemoved));
        }
        let hover = session.hover_position?;
        let is_valid = is_valid(
            &hover,
            widgets,
            Some(session.active_widget_id.as_str()),
            grid.columns,
        );
        let changed = session.is_valid != is_valid;
        session.is_valid = is_valid;
        debug!(
            target: "panelgrid::drag",
            hover = %hover,
            columns = grid.columns,
            is_valid,
            "hover revalidated"
        );
        Some(self.transition(
            from,
            None,
            DragEffect::Hovered {
                hover,
                is_valid,
                changed,
            },
        ))
    }

    fn revert(
        &mut self,
        from: DragPhase,
        session: DragSession,
        reason: RevertReason,
    ) -> DragTransition {
        debug!(
            target: "panelgrid::drag",
            widget_id = %session.active_widget_id,
            restore = %session.origin_position,
            ?reason,
            "drag reverted"
        );
        self.state = DragState::Idle;
        self.transition(
            from,
            Some(DragPhase::Reverting),
            DragEffect::Reverted {
                widget_id: session.active_widget_id,
                restore: session.origin_position,
                reason,
            },
        )
    }

    fn noop(&mut self, reason: DragNoopReason) -> DragTransition {
        let from = self.phase();
        self.transition(from, None, DragEffect::Noop { reason })
    }

    fn transition(
        &mut self,
        from: DragPhase,
        through: Option<DragPhase>,
        effect: DragEffect,
    ) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            from,
            through,
            to: self.phase(),
            effect,
        }
    }
}

/// Candidate for the pointer cell. Saturates: `pixel_to_cell` maps far-away
/// finite pointers to `i32::MAX`.
fn candidate_for(session: &DragSession, current: GridPosition, cell: GridCell) -> GridPosition {
    match session.kind {
        DragKind::Move => GridPosition {
            row: cell.row.saturating_sub(session.grab_offset.row),
            col: cell.col.saturating_sub(session.grab_offset.col),
            width: current.width,
            height: current.height,
        },
        DragKind::Resize => GridPosition {
            row: current.row,
            col: current.col,
            width: span_to(current.col, cell.col),
            height: span_to(current.row, cell.row),
        },
    }
}

/// Inclusive span from `start` to `end`, at least 1.
fn span_to(start: i32, end: i32) -> i32 {
    end.saturating_sub(start).saturating_add(1).max(1)
}
