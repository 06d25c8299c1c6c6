#![forbid(unsafe_code)]

//! panelgrid public facade.
//!
//! # Role
//! `panelgrid` is the crate hosts depend on. It re-exports the input-port
//! types from `panelgrid-core` and the engine from `panelgrid-layout`, and
//! adds the pieces that sit between them and a host:
//!
//! - [`GridEngine`]: consumes [`HostEvent`]s and forwards accepted changes to
//!   an [`UpdateSink`].
//! - [`RendererRegistry`]: maps widget kinds to content renderers.
//! - [`Error`] / [`Result`]: construction errors across the workspace.
//!
//! # Example
//!
//! ```
//! use panelgrid::{EngineConfig, GridEngine, GridPosition, UpdateRequest, Widget};
//!
//! let mut engine = GridEngine::new(EngineConfig::default(), 1200.0, Vec::<UpdateRequest>::new())?;
//! engine.set_snapshot(vec![Widget::new("a", "clock", GridPosition::new(0, 0, 1, 1)?)]);
//! assert_eq!(engine.grid().columns, 4);
//! assert_eq!(engine.place_new(2, 1), GridPosition::new(0, 1, 2, 1)?);
//! # Ok::<(), panelgrid::Error>(())
//! ```

pub mod engine;
pub mod error;
pub mod registry;

pub use engine::{EngineOutput, GridEngine};
pub use error::{Error, Result};
pub use registry::{RegistryError, RendererRegistry, WidgetKind, WidgetRenderer};

pub use panelgrid_core::{
    EventCoalescer, HandleKind, HandleTarget, HostEvent, Insets, KeyCode, KeyEvent, Modifiers,
    Point, PointerEvent, PointerEventKind, PxRect,
};
pub use panelgrid_layout::{
    Breakpoint, Breakpoints, CancelReason, CellState, ConfigError, DragAnchor, DragCoordinator,
    DragEffect, DragKind, DragNoopReason, DragPhase, DragSession, DragSettings, DragTransition,
    EngineConfig, GridCell, GridConfig, GridOverlay, GridPosition, GridSettings, ModelError,
    NudgeDirection, OverlayCell, ReconcileReport, Responsive, RevertReason, ScrollMetrics,
    UpdateRequest, UpdateSink, Violation, ViolationKind, VirtualizationConfig, VisibleWindow,
    Widget, WidgetUpdate, WidgetWidth, WindowMode,
};
