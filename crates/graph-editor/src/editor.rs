//! Gesture orchestration: pointer and key events to history transactions.
//!
//! A mouse-down is hit tested and opens one transaction for the gesture it
//! starts. Pointer moves only record the pointer; the host drives the
//! gesture with [`GraphEditor::advance`], which re-applies the drag to the
//! state captured at mouse-down. `mouse_up` commits, `Escape` aborts.
//!
//! Only one transaction can be open. A mouse-down that arrives while one is
//! open (for example during pan momentum) is deferred and retried on the
//! next `advance`.

use ce_app_state::{
    ActionId, Cursor, EditorHistory, EphemeralState, HistoryManager, NoopListener, RenderState,
    TimelineSelectionState, TimelineState, Transaction, TransactionListener, ViewState, YBounds,
};
use ce_common::{CurveError, GraphEditorConfig, Rect, Vec2};
use ce_timeline::{
    apply_control_point_shift, apply_new_control_point_shift, apply_timeline_keyframe_shift,
    insert_keyframe_at_index, next_keyframe_id, remove_keyframes, set_value_at_index,
    ControlPointShift, ControlPointSide, KeyframeShift, NewControlPointShift, Timeline,
    TimelineSelection,
};
use tracing::{debug, warn};

use crate::error::EditorResult;
use crate::hit_test::{
    get_action_to_perform_on_mouse_down, view_bounds_bar_width, MouseDownAction, ViewBoundsHandle,
};
use crate::input::{InputState, Key};
use crate::transform::GraphSpace;
use crate::y_bounds::get_y_bounds;

/// Frame duration the momentum decay factor is defined for.
const FRAME_MS: f64 = 16.0;

type Listener = dyn TransactionListener<TimelineState, TimelineSelectionState>;

/// The graph editor engine.
pub struct GraphEditor<I> {
    config: GraphEditorConfig,
    input: I,
    history: EditorHistory,
    view: ViewState,
    listener: Box<Listener>,
    gesture: Option<Gesture>,
    pending_mouse_down: Option<Vec2>,
    mouse_is_down: bool,
    idle_ephemeral: EphemeralState,
}

struct Gesture {
    tx: Transaction,
    kind: GestureKind,
    origin: Vec2,
    pointer: Vec2,
    dragged: bool,
    space: GraphSpace,
    initial: TimelineState,
    initial_view: ViewState,
}

enum GestureKind {
    Pan(PanState),
    Zoom {
        zoom_out: bool,
    },
    ViewBoundsHandle(ViewBoundsHandle),
    PanViewBounds,
    Keyframe {
        timeline_id: String,
        keyframe_id: String,
        additive: bool,
        was_selected: bool,
    },
    ControlPoint {
        side: ControlPointSide,
        distance: f64,
    },
    NewControlPoints {
        timeline_id: String,
        keyframe_id: String,
    },
    RectSelect {
        base: TimelineSelectionState,
        additive: bool,
    },
}

struct PanState {
    /// Total pan in pixels, including momentum after release.
    offset: Vec2,
    last_pointer: Vec2,
    /// Pixels per millisecond.
    velocity: Vec2,
    releasing: bool,
}

/// Forwards transaction results to the host and applies committed views.
struct ViewSink<'a> {
    view: &'a mut ViewState,
    host: &'a mut Listener,
}

impl TransactionListener<TimelineState, TimelineSelectionState> for ViewSink<'_> {
    fn on_submit(
        &mut self,
        name: &str,
        primary: &TimelineState,
        selection: &TimelineSelectionState,
    ) {
        self.host.on_submit(name, primary, selection);
    }

    fn on_cancel(&mut self) {
        self.host.on_cancel();
    }

    fn on_submit_view(&mut self, view: &ViewState) {
        *self.view = view.clone();
        self.host.on_submit_view(view);
    }
}

impl<I: InputState> GraphEditor<I> {
    pub fn new(timelines: Vec<Timeline>, view: ViewState, input: I) -> Self {
        Self {
            config: GraphEditorConfig::default(),
            input,
            history: HistoryManager::new(
                TimelineState::new(timelines),
                TimelineSelectionState::new(),
            ),
            view,
            listener: Box::new(NoopListener),
            gesture: None,
            pending_mouse_down: None,
            mouse_is_down: false,
            idle_ephemeral: EphemeralState::default(),
        }
    }

    pub fn with_config(mut self, config: GraphEditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_listener(mut self, listener: Box<Listener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn config(&self) -> &GraphEditorConfig {
        &self.config
    }

    pub fn history(&self) -> &EditorHistory {
        &self.history
    }

    /// Committed view (a pan or zoom in progress is in [`Self::render_state`]).
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn has_pending_mouse_down(&self) -> bool {
        self.pending_mouse_down.is_some()
    }

    pub fn set_frame_index(&mut self, frame_index: i64) {
        self.view.frame_index = frame_index;
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.view.viewport = viewport;
    }

    /// Value range used for drawing and hit testing: frozen for the open
    /// gesture, else the pinned range, else fitted to the visible curves.
    pub fn y_bounds(&self) -> YBounds {
        if let Some(y_bounds) = self.gesture.as_ref().and_then(|g| g.tx.ephemeral().y_bounds) {
            return y_bounds;
        }
        self.view.y_bounds.unwrap_or_else(|| {
            get_y_bounds(
                &self.history.live_primary().timelines,
                self.view.view_bounds,
                self.view.length,
                &self.config,
            )
        })
    }

    /// Everything the drawing collaborator needs for the current frame.
    pub fn render_state(&self) -> RenderState<'_> {
        let (view, ephemeral) = match &self.gesture {
            Some(g) => (g.tx.view().unwrap_or(&self.view), g.tx.ephemeral()),
            None => (&self.view, &self.idle_ephemeral),
        };
        RenderState {
            primary: self.history.live_primary(),
            selection: self.history.live_selection(),
            view,
            ephemeral,
        }
    }

    // --- Events ---

    pub fn mouse_down(&mut self, global_pos: Vec2) {
        self.mouse_is_down = true;
        if self.history.is_in_flight() {
            debug!(pos = %global_pos, "Transaction open, deferring mouse down");
            self.pending_mouse_down = Some(global_pos);
            return;
        }
        self.start_gesture(global_pos);
    }

    pub fn mouse_move(&mut self, global_pos: Vec2) {
        let Some(g) = self.gesture.as_mut() else {
            return;
        };
        g.pointer = global_pos;
        if !g.dragged && g.pointer.distance(g.origin) >= self.config.drag_start_distance_px {
            g.dragged = true;
        }
    }

    pub fn mouse_up(&mut self) {
        self.mouse_is_down = false;
        let Some(mut g) = self.gesture.take() else {
            return;
        };
        apply_drag(&mut g, &mut self.history, &self.input, &self.config, 0.0);

        if let GestureKind::Pan(pan) = &mut g.kind {
            if !pan.releasing && pan.velocity.length() >= self.config.pan_momentum_min_speed {
                pan.releasing = true;
                debug!(velocity = %pan.velocity, "Pan released with momentum");
                self.gesture = Some(g);
                return;
            }
        }

        let (name, allow_index_shift) = self.finish(&mut g);
        self.commit(g, name, allow_index_shift);
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Escape => self.abort_gesture(),
            Key::Delete | Key::Backspace => {
                if self.gesture.is_none() {
                    self.delete_selected_keyframes();
                }
            }
            _ => {}
        }
    }

    /// Advance the open gesture by one tick of `delta_ms` milliseconds, then
    /// retry a deferred mouse-down if the history is free again.
    pub fn advance(&mut self, delta_ms: f64) {
        let done = self
            .gesture
            .as_ref()
            .is_some_and(|g| self.history.action_id() != Some(g.tx.id()));
        if done {
            debug!("Gesture transaction closed elsewhere, stopping");
            self.gesture = None;
        }

        if let Some(mut g) = self.gesture.take() {
            apply_drag(&mut g, &mut self.history, &self.input, &self.config, delta_ms);
            let momentum_over = match &g.kind {
                GestureKind::Pan(pan) if pan.releasing => {
                    pan.velocity.length() < self.config.pan_momentum_min_speed
                        || self.pending_mouse_down.is_some()
                }
                _ => false,
            };
            if momentum_over {
                self.commit(g, "Pan", false);
            } else {
                self.gesture = Some(g);
            }
        }

        if self.gesture.is_none() {
            if let Some(pos) = self.pending_mouse_down.take() {
                if self.mouse_is_down {
                    debug!(pos = %pos, "Retrying deferred mouse down");
                    self.start_gesture(pos);
                } else {
                    debug!(pos = %pos, "Dropping deferred mouse down, button released");
                }
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        self.history.redo()
    }

    // --- Direct edits ---

    /// Set `timeline_id`'s value at the current frame, creating a keyframe
    /// there if needed. One history entry.
    pub fn set_value_at_frame(&mut self, timeline_id: &str, value: f64) -> EditorResult<()> {
        let frame = self.view.frame_index;
        let next = {
            let timeline = self.live_timeline(timeline_id)?;
            set_value_at_index(timeline, frame, value, next_keyframe_id(timeline.keyframe_ids()))?
        };

        let mut tx = Transaction::begin(&mut self.history, ActionId::next())?;
        tx.mutate_primary(&mut self.history, |p| replace_timeline(p, next));
        let outcome = tx.commit(&mut self.history, "Set value", false, self.listener.as_mut());
        outcome.into_result()?;
        Ok(())
    }

    /// Add a keyframe to `timeline_id` at the current frame, keeping the
    /// curve's value there, and select it. Returns the keyframe id (the
    /// existing one if a keyframe already sits on the frame).
    pub fn add_keyframe_at_frame(&mut self, timeline_id: &str) -> EditorResult<String> {
        let frame = self.view.frame_index;
        let (next, new_id) = {
            let timeline = self.live_timeline(timeline_id)?;
            if let Some(pos) = timeline.position_at_index(frame) {
                return Ok(timeline.keyframes[pos].id.clone());
            }
            let new_id = next_keyframe_id(timeline.keyframe_ids());
            (insert_keyframe_at_index(timeline, frame, new_id.clone())?, new_id)
        };

        let mut tx = Transaction::begin(&mut self.history, ActionId::next())?;
        tx.mutate_primary(&mut self.history, |p| replace_timeline(p, next));
        tx.mutate_selection(&mut self.history, |s| s.select_keyframe(timeline_id, &new_id, false));
        let outcome = tx.commit(&mut self.history, "Add keyframe", true, self.listener.as_mut());
        outcome.into_result()?;
        Ok(new_id)
    }

    /// Remove every selected keyframe. Returns how many were removed.
    pub fn delete_selected_keyframes(&mut self) -> usize {
        let selection = self.history.live_selection().clone();
        if selection.is_empty() {
            return 0;
        }

        let before = self.history.live_primary();
        let next = map_selected(before, &selection, |tl, sel| remove_keyframes(tl, &sel.keyframes));
        let removed = before.total_keyframes() - next.total_keyframes();
        let remaining = pruned_selection(&selection, &next);

        let mut tx = match Transaction::begin(&mut self.history, ActionId::next()) {
            Ok(tx) => tx,
            Err(err) => {
                warn!(%err, "Cannot delete keyframes");
                return 0;
            }
        };
        tx.mutate_primary(&mut self.history, |p| *p = next);
        tx.mutate_selection(&mut self.history, |s| *s = remaining);
        let outcome =
            tx.commit(&mut self.history, "Delete keyframes", false, self.listener.as_mut());
        if !outcome.is_ok() {
            warn!(outcome = ?outcome, "Delete keyframes rejected");
            return 0;
        }
        debug!(removed, "Keyframes deleted");
        removed
    }

    // --- Gestures ---

    fn start_gesture(&mut self, global_pos: Vec2) {
        let y_bounds = self.y_bounds();
        let action = get_action_to_perform_on_mouse_down(
            global_pos,
            &self.input,
            &self.history.live_primary().timelines,
            &self.view,
            y_bounds,
            &self.config,
        );

        let mut tx = match Transaction::begin(&mut self.history, ActionId::next()) {
            Ok(tx) => tx,
            Err(err) => {
                warn!(%err, "Cannot start gesture, deferring");
                self.pending_mouse_down = Some(global_pos);
                return;
            }
        };
        let space = GraphSpace::new(&self.view, y_bounds, &self.config);
        let initial = self.history.live_primary().clone();
        let shift_down = self.input.is_key_down(Key::Shift);

        debug!(pos = %global_pos, action = ?action, "Gesture started");

        let (kind, cursor) = match action {
            MouseDownAction::Pan => (
                GestureKind::Pan(PanState {
                    offset: Vec2::ZERO,
                    last_pointer: global_pos,
                    velocity: Vec2::ZERO,
                    releasing: false,
                }),
                Cursor::Grabbing,
            ),
            MouseDownAction::ZoomIn => (GestureKind::Zoom { zoom_out: false }, Cursor::ZoomIn),
            MouseDownAction::ZoomOut => (GestureKind::Zoom { zoom_out: true }, Cursor::ZoomOut),
            MouseDownAction::DragViewBoundsHandle { handle } => {
                (GestureKind::ViewBoundsHandle(handle), Cursor::EwResize)
            }
            MouseDownAction::PanViewBounds => (GestureKind::PanViewBounds, Cursor::Grabbing),
            MouseDownAction::MouseDownKeyframe {
                timeline_id,
                keyframe_id,
            } => {
                let was_selected = self
                    .history
                    .live_selection()
                    .is_keyframe_selected(&timeline_id, &keyframe_id);
                if shift_down {
                    tx.mutate_selection(&mut self.history, |s| {
                        s.toggle_keyframe(&timeline_id, &keyframe_id)
                    });
                } else if !was_selected {
                    tx.mutate_selection(&mut self.history, |s| {
                        s.select_keyframe(&timeline_id, &keyframe_id, false)
                    });
                }
                (
                    GestureKind::Keyframe {
                        timeline_id,
                        keyframe_id,
                        additive: shift_down,
                        was_selected,
                    },
                    Cursor::Move,
                )
            }
            MouseDownAction::MouseDownControlPoint {
                timeline_id,
                keyframe_id,
                side,
            } => {
                if !self
                    .history
                    .live_selection()
                    .is_keyframe_selected(&timeline_id, &keyframe_id)
                {
                    tx.mutate_selection(&mut self.history, |s| {
                        s.select_keyframe(&timeline_id, &keyframe_id, false)
                    });
                }
                let distance = initial
                    .timeline(&timeline_id)
                    .and_then(|tl| {
                        let pos = tl.position_of(&keyframe_id)?;
                        let neighbor = tl.neighbor(pos, side)?;
                        Some((neighbor.index - tl.keyframes[pos].index).abs() as f64)
                    })
                    .unwrap_or(1.0);
                (GestureKind::ControlPoint { side, distance }, Cursor::Move)
            }
            MouseDownAction::AltMouseDownKeyframe {
                timeline_id,
                keyframe_id,
            } => {
                tx.mutate_selection(&mut self.history, |s| {
                    s.select_keyframe(&timeline_id, &keyframe_id, false)
                });
                (
                    GestureKind::NewControlPoints {
                        timeline_id,
                        keyframe_id,
                    },
                    Cursor::Move,
                )
            }
            MouseDownAction::Empty => {
                let base = if shift_down {
                    self.history.live_selection().clone()
                } else {
                    TimelineSelectionState::new()
                };
                (
                    GestureKind::RectSelect {
                        base,
                        additive: shift_down,
                    },
                    Cursor::Crosshair,
                )
            }
        };

        let ephemeral = tx.ephemeral_mut();
        ephemeral.y_bounds = Some(y_bounds);
        ephemeral.cursor = cursor;

        self.gesture = Some(Gesture {
            tx,
            kind,
            origin: global_pos,
            pointer: global_pos,
            dragged: false,
            space,
            initial,
            initial_view: self.view.clone(),
        });
    }

    /// Final changes of a gesture on mouse-up. Returns the history entry name
    /// and whether the entry allows index shifting.
    fn finish(&mut self, g: &mut Gesture) -> (&'static str, bool) {
        let history = &mut self.history;
        match &g.kind {
            GestureKind::Pan(_) => ("Pan", false),
            GestureKind::Zoom { zoom_out } => {
                let view =
                    zoomed_view(&g.initial_view, &g.space, g.pointer, *zoom_out, &self.config);
                g.tx.set_view(view);
                ("Zoom", false)
            }
            GestureKind::ViewBoundsHandle(_) => ("Resize view bounds", false),
            GestureKind::PanViewBounds => ("Pan view bounds", false),
            GestureKind::Keyframe {
                timeline_id,
                keyframe_id,
                additive,
                was_selected,
            } => {
                if g.dragged {
                    return ("Move keyframes", true);
                }
                // Clicking one of several selected keyframes selects only it.
                if !additive && *was_selected && history.live_selection().count() > 1 {
                    g.tx.mutate_selection(history, |s| {
                        s.select_keyframe(timeline_id, keyframe_id, false)
                    });
                }
                ("Select keyframe", true)
            }
            GestureKind::ControlPoint { .. } => ("Move control points", true),
            GestureKind::NewControlPoints {
                timeline_id,
                keyframe_id,
            } => {
                if g.dragged {
                    return ("Create control points", true);
                }
                // Alt-click without a drag removes the keyframe's control points.
                let Some(timeline) = g.initial.timeline(timeline_id) else {
                    return ("Remove control points", true);
                };
                let mut next = timeline.clone();
                let Some(keyframe) = next.keyframes.iter_mut().find(|k| &k.id == keyframe_id) else {
                    return ("Remove control points", true);
                };
                if keyframe.control_point_left.is_some() || keyframe.control_point_right.is_some() {
                    keyframe.control_point_left = None;
                    keyframe.control_point_right = None;
                    keyframe.reflect_control_points = false;
                    g.tx.mutate_primary(history, |p| replace_timeline(p, next));
                }
                ("Remove control points", true)
            }
            GestureKind::RectSelect { additive, .. } => {
                g.tx.ephemeral_mut().drag_selection_rect = None;
                if !g.dragged && !additive && !history.live_selection().is_empty() {
                    g.tx.mutate_selection(history, |s| s.clear());
                }
                ("Select keyframes", false)
            }
        }
    }

    fn commit(&mut self, g: Gesture, name: &str, allow_index_shift: bool) {
        let mut sink = ViewSink {
            view: &mut self.view,
            host: self.listener.as_mut(),
        };
        let outcome = g.tx.commit(&mut self.history, name, allow_index_shift, &mut sink);
        if outcome.is_ok() {
            debug!(name, dragged = g.dragged, "Gesture committed");
        } else {
            warn!(name, outcome = ?outcome, "Gesture commit rejected");
        }
    }

    fn abort_gesture(&mut self) {
        self.pending_mouse_down = None;
        if let Some(g) = self.gesture.take() {
            let outcome = g.tx.abort(&mut self.history, self.listener.as_mut());
            debug!(outcome = ?outcome, "Gesture aborted");
        }
    }

    fn live_timeline(&self, timeline_id: &str) -> Result<&Timeline, CurveError> {
        self.history
            .live_primary()
            .timeline(timeline_id)
            .ok_or_else(|| CurveError::TimelineNotFound {
                timeline_id: timeline_id.to_string(),
            })
    }
}

/// Re-apply the gesture for the current pointer. `delta_ms` is the time
/// since the previous tick (0 for the final update on mouse-up).
fn apply_drag(
    g: &mut Gesture,
    history: &mut EditorHistory,
    input: &dyn InputState,
    config: &GraphEditorConfig,
    delta_ms: f64,
) {
    let delta_px = g.pointer - g.origin;
    let delta = g.space.pixel_delta_to_normal(delta_px);

    match &mut g.kind {
        GestureKind::Pan(pan) => {
            if pan.releasing {
                pan.offset = pan.offset + pan.velocity * delta_ms;
                pan.velocity = pan.velocity * config.pan_momentum_decay.powf(delta_ms / FRAME_MS);
            } else {
                if delta_ms > 0.0 {
                    pan.velocity = (g.pointer - pan.last_pointer) * (1.0 / delta_ms);
                    pan.last_pointer = g.pointer;
                }
                pan.offset = delta_px;
            }
            let view = panned_view(&g.initial_view, &g.space, pan.offset);
            g.tx.ephemeral_mut().pan = Some(pan.offset);
            g.tx.set_view(view);
        }
        GestureKind::Zoom { .. } => {}
        GestureKind::ViewBoundsHandle(handle) => {
            let d = delta_px.x / view_bounds_bar_width(&g.initial_view, config);
            let [a, b] = g.initial_view.view_bounds;
            let min = config.min_view_bounds_width;
            let bounds = match handle {
                ViewBoundsHandle::Left => [(a + d).min(b - min), b],
                ViewBoundsHandle::Right => [a, (b + d).max(a + min)],
            };
            let mut view = g.initial_view.clone();
            view.set_view_bounds(bounds, min);
            g.tx.set_view(view);
        }
        GestureKind::PanViewBounds => {
            let d = delta_px.x / view_bounds_bar_width(&g.initial_view, config);
            let mut view = g.initial_view.clone();
            view.pan_view_bounds(d);
            g.tx.set_view(view);
        }
        GestureKind::Keyframe { .. } => {
            if !g.dragged {
                return;
            }
            let shift = KeyframeShift { shift_vector: delta };
            let selection = history.live_selection().clone();
            let next = map_selected(&g.initial, &selection, |tl, sel| {
                apply_timeline_keyframe_shift(tl, sel, &shift)
            });
            let pruned = pruned_selection(&selection, &next);
            g.tx.ephemeral_mut().keyframe_shift = Some(shift);
            g.tx.mutate_primary(history, |p| *p = next);
            if pruned != selection {
                g.tx.mutate_selection(history, |s| *s = pruned);
            }
        }
        GestureKind::ControlPoint { side, distance } => {
            if !g.dragged {
                return;
            }
            let shift = ControlPointShift {
                shift_vector: delta,
                distance_between_keyframes: *distance,
                direction: *side,
                y_fac: g.space.y_fac(),
                shift_key_down: input.is_key_down(Key::Shift),
            };
            let selection = history.live_selection().clone();
            let next = map_selected(&g.initial, &selection, |tl, sel| {
                apply_control_point_shift(tl, sel, &shift)
            });
            g.tx.ephemeral_mut().control_point_shift = Some(shift);
            g.tx.mutate_primary(history, |p| *p = next);
        }
        GestureKind::NewControlPoints {
            timeline_id,
            keyframe_id,
        } => {
            if !g.dragged {
                return;
            }
            let Some(timeline) = g.initial.timeline(timeline_id) else {
                return;
            };
            let shift = NewControlPointShift {
                keyframe_id: keyframe_id.clone(),
                shift_vector: delta,
                direction: if delta.x < 0.0 {
                    ControlPointSide::Left
                } else {
                    ControlPointSide::Right
                },
            };
            let next = apply_new_control_point_shift(timeline, &shift);
            g.tx.ephemeral_mut().new_control_point_shift = Some(shift);
            g.tx.mutate_primary(history, |p| replace_timeline(p, next));
        }
        GestureKind::RectSelect { base, .. } => {
            if !g.dragged {
                return;
            }
            let rect = Rect::from_points(
                g.space.global_to_viewport(g.origin),
                g.space.global_to_viewport(g.pointer),
            );
            let mut selection = base.clone();
            for timeline in &g.initial.timelines {
                for keyframe in &timeline.keyframes {
                    let p = g
                        .space
                        .normal_to_viewport(Vec2::new(keyframe.index as f64, keyframe.value));
                    if rect.contains(p) {
                        selection.select_keyframe(&timeline.id, &keyframe.id, true);
                    }
                }
            }
            g.tx.ephemeral_mut().drag_selection_rect = Some(rect);
            g.tx.mutate_selection(history, |s| *s = selection);
        }
    }
}

/// Apply `f` to every timeline with selected keyframes.
fn map_selected(
    state: &TimelineState,
    selection: &TimelineSelectionState,
    f: impl Fn(&Timeline, &TimelineSelection) -> Timeline,
) -> TimelineState {
    TimelineState::new(
        state
            .timelines
            .iter()
            .map(|tl| {
                let sel = selection.get(&tl.id);
                if sel.is_empty() {
                    tl.clone()
                } else {
                    f(tl, sel)
                }
            })
            .collect(),
    )
}

/// `selection` without the ids of keyframes or timelines missing from `state`.
fn pruned_selection(
    selection: &TimelineSelectionState,
    state: &TimelineState,
) -> TimelineSelectionState {
    let mut pruned = selection.clone();
    for (timeline_id, _) in selection.iter() {
        match state.timeline(timeline_id) {
            Some(timeline) => pruned.retain_existing(timeline_id, timeline.keyframe_ids()),
            None => pruned.clear_timeline(timeline_id),
        }
    }
    pruned
}

fn replace_timeline(state: &mut TimelineState, timeline: Timeline) {
    if let Err(err) = state.replace(timeline) {
        warn!(%err, "Edited timeline disappeared");
    }
}

/// View after panning by `offset` pixels: horizontal pan moves the view
/// bounds, vertical pan pins the value range.
fn panned_view(initial: &ViewState, space: &GraphSpace, offset: Vec2) -> ViewState {
    let mut view = initial.clone();
    if view.length > 0.0 {
        let frames = -offset.x / space.pixels_per_frame();
        view.pan_view_bounds(frames / view.length);
    }
    view.y_bounds = Some(space.y_bounds.offset(offset.y / space.pixels_per_value()));
    view
}

/// View after zooming around the frame under `pointer`.
fn zoomed_view(
    initial: &ViewState,
    space: &GraphSpace,
    pointer: Vec2,
    zoom_out: bool,
    config: &GraphEditorConfig,
) -> ViewState {
    let mut view = initial.clone();
    if view.length <= 0.0 {
        return view;
    }
    let focus = space.global_to_normal(pointer).x / view.length;
    let [a, b] = view.view_bounds;
    let width = b - a;
    let new_width = if zoom_out {
        width * config.zoom_factor
    } else {
        width / config.zoom_factor
    };
    let rel = if width > 0.0 { (focus - a) / width } else { 0.5 };
    let start = focus - rel * new_width;
    view.set_view_bounds([start, start + new_width], config.min_view_bounds_width);
    view
}
