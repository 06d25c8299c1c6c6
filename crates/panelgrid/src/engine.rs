#![forbid(unsafe_code)]

//! Host driver: feeds [`HostEvent`]s through the layout engine.
//!
//! [`GridEngine`] owns the derived grid metrics, the scroll position, the drag
//! coordinator and the latest widget snapshot. It never edits the snapshot:
//! every accepted change goes to the [`UpdateSink`] and comes back as a new
//! snapshot via [`GridEngine::set_snapshot`].
//!
//! # Event flow
//!
//! ```text
//! host ──HostEvent──▶ EventCoalescer ──▶ handle_event ──▶ DragCoordinator
//!                                              │                 │
//!                                              ▼                 ▼
//!                                         reconcile        UpdateRequest ──▶ UpdateSink
//! ```
//!
//! # Failure Modes
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | Pointer-down outside any widget handle | ignored |
//! | Arrow key with no focused widget | ignored |
//! | Snapshot drops the dragged widget | drag reverts with `TargetRemoved` |
//! | Container shrinks below a widget's span | corrective updates sent to the sink |

use panelgrid_core::event::{
    HandleKind, HostEvent, KeyCode, KeyEvent, PointerEvent, PointerEventKind,
};
use panelgrid_core::event_coalescer::EventCoalescer;
use panelgrid_layout::{
    CancelReason, DragCoordinator, DragKind, DragTransition, EngineConfig, GridConfig,
    GridOverlay, GridPosition, NudgeDirection, ReconcileReport, ScrollMetrics, UpdateRequest,
    UpdateSink, VisibleWindow, Widget, WidgetWidth, compute_window, first_free_position, nudge,
    reconcile, set_widget_width, toggle_collapsed,
};
use tracing::debug;

/// What one handled event produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutput {
    /// A drag lifecycle step. Commits were already dispatched to the sink.
    Drag(DragTransition),
    /// The grid was re-derived for a new container width.
    Resized {
        grid: GridConfig,
        /// Hover re-check of an active drag.
        revalidated: Option<DragTransition>,
        /// Corrective updates already dispatched to the sink.
        report: ReconcileReport,
    },
    /// A keyboard action request, already dispatched.
    Action(UpdateRequest),
    /// Scroll state updated.
    Scrolled(VisibleWindow),
    /// Nothing to do.
    Ignored,
}

/// Event-driven wrapper around the layout engine.
#[derive(Debug)]
pub struct GridEngine<S: UpdateSink> {
    config: EngineConfig,
    grid: GridConfig,
    widgets: Vec<Widget>,
    drag: DragCoordinator,
    scroll: ScrollMetrics,
    coalescer: EventCoalescer,
    focused: Option<String>,
    sink: S,
}

impl<S: UpdateSink> GridEngine<S> {
    /// Validate `config` and derive the grid for `container_width`.
    pub fn new(config: EngineConfig, container_width: f64, sink: S) -> crate::Result<Self> {
        config.validate()?;
        let grid = GridConfig::from_width(container_width, &config.grid);
        debug!(
            target: "panelgrid::engine",
            container_width,
            columns = grid.columns,
            cell_size = grid.cell_size,
            breakpoint = %grid.breakpoint,
            "engine created"
        );
        Ok(Self {
            drag: DragCoordinator::new(config.drag.anchor),
            config,
            grid,
            widgets: Vec::new(),
            scroll: ScrollMetrics::default(),
            coalescer: EventCoalescer::new(),
            focused: None,
            sink,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    #[must_use]
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    #[must_use]
    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    #[must_use]
    pub fn scroll(&self) -> ScrollMetrics {
        self.scroll
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Widget that receives keyboard nudges.
    pub fn focus(&mut self, widget_id: Option<&str>) {
        self.focused = widget_id.map(str::to_owned);
    }

    /// Replace the snapshot with the store's latest ground truth.
    ///
    /// An active drag is re-validated against it, then the snapshot is
    /// reconciled for the current column count and any corrections are sent
    /// to the sink.
    pub fn set_snapshot(
        &mut self,
        widgets: Vec<Widget>,
    ) -> (Option<DragTransition>, ReconcileReport) {
        self.widgets = widgets;
        if self
            .focused
            .as_deref()
            .is_some_and(|id| !self.widgets.iter().any(|w| w.id == id))
        {
            self.focused = None;
        }
        let revalidated = self.drag.revalidate(&self.widgets, &self.grid);
        let report = self.reconcile();
        (revalidated, report)
    }

    /// Queue an event; high-frequency kinds are coalesced until [`flush`](Self::flush).
    ///
    /// A pass-through event first drains pending events so that, for
    /// example, a release sees the final pointer position.
    pub fn push_event(&mut self, event: HostEvent) -> Vec<EngineOutput> {
        match self.coalescer.push(event) {
            None => Vec::new(),
            Some(event) => {
                let mut out = self.flush();
                out.push(self.handle_event(event));
                out
            }
        }
    }

    /// Handle every coalesced event.
    pub fn flush(&mut self) -> Vec<EngineOutput> {
        self.coalescer
            .flush()
            .into_iter()
            .map(|event| self.handle_event(event))
            .collect()
    }

    /// Handle one event immediately.
    pub fn handle_event(&mut self, event: HostEvent) -> EngineOutput {
        match event {
            HostEvent::Pointer(pointer) => self.handle_pointer(pointer),
            HostEvent::Key(key) => self.handle_key(&key),
            HostEvent::ContainerResized { width } => self.resize(width),
            HostEvent::Scrolled {
                scroll_top,
                viewport_height,
            } => {
                self.scroll = ScrollMetrics::new(scroll_top, viewport_height);
                EngineOutput::Scrolled(self.window())
            }
            HostEvent::FocusLost => self.cancel_drag(CancelReason::FocusLost),
        }
    }

    fn handle_pointer(&mut self, pointer: PointerEvent) -> EngineOutput {
        let PointerEvent {
            kind,
            position,
            pointer_id,
            ..
        } = pointer;
        match kind {
            PointerEventKind::Down { target: Some(target) } => {
                let kind = match target.handle {
                    HandleKind::Move => DragKind::Move,
                    HandleKind::ResizeCorner => DragKind::Resize,
                };
                self.focused = Some(target.widget_id.clone());
                EngineOutput::Drag(self.drag.begin(
                    &target.widget_id,
                    kind,
                    position,
                    pointer_id,
                    &self.widgets,
                    &self.grid,
                ))
            }
            PointerEventKind::Down { target: None } => EngineOutput::Ignored,
            PointerEventKind::Moved => EngineOutput::Drag(self.drag.pointer_move(
                position,
                pointer_id,
                &self.widgets,
                &self.grid,
            )),
            PointerEventKind::Up => {
                let transition = self.drag.end(pointer_id, &self.widgets, &self.grid);
                if let Some(request) = transition.effect.commit_request() {
                    request.dispatch(&mut self.sink);
                }
                EngineOutput::Drag(transition)
            }
            PointerEventKind::Cancel => self.cancel_drag(CancelReason::PointerCancel),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> EngineOutput {
        if key.is_escape() {
            return self.cancel_drag(CancelReason::EscapeKey);
        }
        if self.drag.is_active() {
            return EngineOutput::Ignored;
        }
        let Some(widget_id) = self.focused.clone() else {
            return EngineOutput::Ignored;
        };
        let request = match &key.code {
            code @ (KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right) => {
                NudgeDirection::from_key(code).and_then(|direction| {
                    nudge(&self.widgets, &widget_id, direction, self.grid.columns)
                })
            }
            KeyCode::Char('c') => toggle_collapsed(&self.widgets, &widget_id),
            KeyCode::Char('f') => self.toggle_full_width(&widget_id),
            _ => None,
        };
        self.dispatch(request)
    }

    fn toggle_full_width(&self, widget_id: &str) -> Option<UpdateRequest> {
        let current = self.widgets.iter().find(|w| w.id == widget_id)?;
        let next = match current.widget_width {
            WidgetWidth::Half => WidgetWidth::Full,
            WidgetWidth::Full => WidgetWidth::Half,
        };
        set_widget_width(&self.widgets, widget_id, next, self.grid.columns)
    }

    fn dispatch(&mut self, request: Option<UpdateRequest>) -> EngineOutput {
        match request {
            Some(request) => {
                request.dispatch(&mut self.sink);
                EngineOutput::Action(request)
            }
            None => EngineOutput::Ignored,
        }
    }

    fn cancel_drag(&mut self, reason: CancelReason) -> EngineOutput {
        if self.drag.is_active() {
            EngineOutput::Drag(self.drag.cancel(reason))
        } else {
            EngineOutput::Ignored
        }
    }

    /// Re-derive the grid for a new container width.
    pub fn resize(&mut self, container_width: f64) -> EngineOutput {
        let previous = self.grid.columns;
        self.grid = GridConfig::from_width(container_width, &self.config.grid);
        debug!(
            target: "panelgrid::engine",
            container_width,
            previous_columns = previous,
            columns = self.grid.columns,
            cell_size = self.grid.cell_size,
            breakpoint = %self.grid.breakpoint,
            "grid resized"
        );
        let revalidated = self.drag.revalidate(&self.widgets, &self.grid);
        let report = self.reconcile();
        EngineOutput::Resized {
            grid: self.grid,
            revalidated,
            report,
        }
    }

    fn reconcile(&mut self) -> ReconcileReport {
        let report = reconcile(&self.widgets, self.grid.columns);
        report.dispatch(&mut self.sink);
        report
    }

    /// Visible window for the current scroll position, one item per cell slot.
    #[must_use]
    pub fn window(&self) -> VisibleWindow {
        compute_window(
            self.scroll,
            self.config.virtualization.item_height(self.grid.pitch()),
            usize::from(self.grid.columns),
            self.widgets.len(),
            &self.config.virtualization,
        )
    }

    /// Cell classification for the current hover.
    #[must_use]
    pub fn overlay(&self) -> GridOverlay {
        let exclude = self.drag.session().map(|s| s.active_widget_id.as_str());
        GridOverlay::compute(&self.grid, &self.widgets, self.drag.hover(), exclude)
    }

    /// First free slot for a new `width × height` widget.
    #[must_use]
    pub fn place_new(&self, width: i32, height: i32) -> GridPosition {
        let occupied: Vec<GridPosition> = self.widgets.iter().map(|w| w.grid_position).collect();
        first_free_position(width, height, &occupied, self.grid.columns)
    }
}
