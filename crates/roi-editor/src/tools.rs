//! Pointer-driven curve editing.
//!
//! [`CurveEditor`] owns the [`CurveRegistry`] and turns normalized input
//! events into registry mutations. Drags re-register the curve on every
//! move, so the edit is visible mid-drag and the curve stays most recent.
//!
//! ## Gestures
//!
//! | Gesture | Idle | Constructing |
//! |---------|------|--------------|
//! | Press on anchor / body | catch it for dragging | place a vertex |
//! | Click on empty space | begin a curve | simple kinds: finish |
//! | Click on a curve | toggle highlight | simple kinds: finish |
//! | Shift+click on body | insert vertex | — |
//! | Alt+click on vertex | remove vertex | — |
//! | Double click on a curve | remove it | — |
//! | Right click | — | finish |
//!
//! A double click arrives as its own [`InputEvent::Click`] with
//! `count >= 2`. Hosts that also report the first click of the pair with
//! `count == 1` start a curve on empty space with it, and the double click
//! that follows is then ignored because a curve is under construction.
//!
//! ## Modifier behaviors
//!
//! **Shift** locks drags and construction to the dominant axis, unless
//! [`EditorConfig::constrain_with_shift`] is off.

use crate::config::EditorConfig;
use crate::dispatch::{Claims, Cursor, InputHandler, Response};
use crate::input::{Button, InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use kurbo::{Line, Point, Rect, Vec2};
use roi_core::hit::{construction_hot_zone, nearest_segment};
use roi_core::{
    AnchorKind, AnchorRef, Curve, CurveKey, CurveKind, CurveRegistry, Hit, ShapeDescriptor,
    constrain_to_axis, curve_for_point, hit_test,
};

/// Where the editor is in a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    ConstructingCurve,
    /// A vertex or edge handle is being dragged.
    AnchorCaught(AnchorRef),
    /// A whole curve is being dragged.
    WholeCurveCaught(CurveKey),
}

pub struct CurveEditor {
    registry: CurveRegistry,
    config: EditorConfig,
    /// Kind of the next curve to construct.
    kind: CurveKind,
    state: EditState,
    /// Press position of the current drag.
    drag_origin: Point,
    /// Drag position already applied to the caught curve.
    last: Point,
}

impl Default for CurveEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl CurveEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_registry(CurveRegistry::new(), config)
    }

    /// Edit an existing registry, typically one built with an observer.
    pub fn with_registry(mut registry: CurveRegistry, config: EditorConfig) -> Self {
        if registry.is_visible() != config.initial_visibility {
            registry.set_visible(config.initial_visibility);
        }
        let state = if registry.is_constructing() {
            EditState::ConstructingCurve
        } else {
            EditState::Idle
        };
        Self {
            registry,
            kind: config.default_kind,
            config,
            state,
            drag_origin: Point::ZERO,
            last: Point::ZERO,
        }
    }

    pub fn registry(&self) -> &CurveRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CurveRegistry {
        &mut self.registry
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Select the kind for the next construction. A curve already in
    /// progress keeps its kind.
    pub fn set_kind(&mut self, kind: CurveKind) {
        self.kind = kind;
    }

    /// Descriptor of a finished curve at the configured flattening tolerance.
    pub fn measure(&self, key: CurveKey) -> Option<roi_core::Result<ShapeDescriptor>> {
        self.registry
            .get(key)
            .map(|c| c.descriptor(self.config.flatten_tolerance))
    }

    /// Descriptors of every finished curve, in draw order.
    pub fn measure_all(&self) -> Vec<(CurveKey, roi_core::Result<ShapeDescriptor>)> {
        self.registry
            .curves()
            .map(|c| (c.key, c.descriptor(self.config.flatten_tolerance)))
            .collect()
    }

    /// Handle one input event.
    pub fn on_event(&mut self, event: &InputEvent) -> Response {
        self.sync_state();
        match event {
            InputEvent::Press {
                at,
                area,
                button,
                modifiers,
            } => self.press(*at, *area, *button, *modifiers),
            InputEvent::Drag { at, modifiers, .. } => self.drag(*at, *modifiers),
            InputEvent::Move {
                at,
                area,
                modifiers,
            } => self.hover(*at, *area, *modifiers),
            InputEvent::Release { .. } => self.release(),
            InputEvent::Click {
                at,
                area,
                button,
                count,
                modifiers,
            } => self.click(*at, *area, *button, *count, *modifiers),
            InputEvent::Key { key, modifiers } => {
                if let Some(action) = ShortcutMap::resolve(key, *modifiers) {
                    self.apply_shortcut(action);
                }
                Response::default()
            }
        }
    }

    pub fn apply_shortcut(&mut self, action: ShortcutAction) {
        self.sync_state();
        match action {
            ShortcutAction::CancelConstruction => {
                if self.registry.cancel_construction() {
                    self.state = EditState::Idle;
                }
            }
            ShortcutAction::FinishConstruction => {
                if self.state == EditState::ConstructingCurve {
                    self.finish();
                }
            }
            ShortcutAction::DeleteHighlighted => {
                let removed = self.registry.remove_highlighted();
                log::debug!("deleted {removed} highlighted curves");
            }
            ShortcutAction::ToggleVisibility => {
                let visible = !self.registry.is_visible();
                self.registry.set_visible(visible);
            }
            ShortcutAction::Kind(kind) => self.set_kind(kind),
        }
    }

    // ─── Pointer gestures ────────────────────────────────────────────────

    fn press(&mut self, at: Point, area: Rect, button: Button, modifiers: Modifiers) -> Response {
        if button == Button::Secondary {
            return Response {
                reserve_secondary_click: self.reserves_secondary_click(area),
                ..Response::default()
            };
        }
        match self.state {
            EditState::ConstructingCurve => {
                // Place where the preview shows it, Shift constraint included.
                let modifiers = self.effective(modifiers);
                self.registry.extend_construction(at, modifiers);
                let point = self
                    .registry
                    .construction()
                    .and_then(|c| c.vertices.last())
                    .filter(|v| v.provisional)
                    .map_or(at, |v| v.point);
                self.registry.place_vertex(point);
                Response::cursor(Cursor::Crosshair)
            }
            EditState::Idle => match hit_test(&self.registry, area) {
                Hit::Anchor(anchor) => {
                    self.catch(at);
                    self.state = match anchor.kind {
                        AnchorKind::WholeCurve => EditState::WholeCurveCaught(anchor.key),
                        _ => EditState::AnchorCaught(anchor),
                    };
                    log::debug!("caught {:?} of curve {}", anchor.kind, anchor.key);
                    Response::cursor(self.anchor_cursor(anchor))
                }
                Hit::Body(key) => {
                    self.catch(at);
                    self.state = EditState::WholeCurveCaught(key);
                    log::debug!("caught curve {key}");
                    Response::cursor(Cursor::Move)
                }
                Hit::Miss => Response::default(),
            },
            EditState::AnchorCaught(_) | EditState::WholeCurveCaught(_) => Response::default(),
        }
    }

    fn drag(&mut self, at: Point, modifiers: Modifiers) -> Response {
        match self.state {
            EditState::AnchorCaught(anchor) => {
                let delta = self.drag_delta(at, modifiers);
                self.registry
                    .update(anchor.key, |curve| drag_anchor(curve, anchor.kind, delta));
                log::trace!("drag {:?} of curve {} by {delta:?}", anchor.kind, anchor.key);
                Response {
                    cursor: Some(self.anchor_cursor(anchor)),
                    drag_handled: true,
                    reserve_secondary_click: false,
                }
            }
            EditState::WholeCurveCaught(key) => {
                let delta = self.drag_delta(at, modifiers);
                self.registry.update(key, |curve| curve.translate(delta));
                log::trace!("drag curve {key} by {delta:?}");
                Response {
                    cursor: Some(Cursor::Move),
                    drag_handled: true,
                    reserve_secondary_click: false,
                }
            }
            EditState::ConstructingCurve => {
                let modifiers = self.effective(modifiers);
                self.registry.extend_construction(at, modifiers);
                Response {
                    cursor: Some(Cursor::Crosshair),
                    drag_handled: true,
                    reserve_secondary_click: false,
                }
            }
            EditState::Idle => Response::default(),
        }
    }

    fn hover(&mut self, at: Point, area: Rect, modifiers: Modifiers) -> Response {
        match self.state {
            EditState::ConstructingCurve => {
                let modifiers = self.effective(modifiers);
                self.registry.extend_construction(at, modifiers);
                let cursor = self.hover_cursor(area).unwrap_or(Cursor::Crosshair);
                Response::cursor(cursor)
            }
            EditState::Idle => Response {
                cursor: self.hover_cursor(area),
                ..Response::default()
            },
            EditState::AnchorCaught(_) | EditState::WholeCurveCaught(_) => Response::default(),
        }
    }

    fn release(&mut self) -> Response {
        if matches!(
            self.state,
            EditState::AnchorCaught(_) | EditState::WholeCurveCaught(_)
        ) {
            log::debug!("released {:?}", self.state);
            self.state = EditState::Idle;
        }
        Response::default()
    }

    fn click(
        &mut self,
        at: Point,
        area: Rect,
        button: Button,
        count: u8,
        modifiers: Modifiers,
    ) -> Response {
        match button {
            Button::Secondary => {
                let reserve = self.reserves_secondary_click(area);
                if self.state == EditState::ConstructingCurve {
                    self.finish();
                }
                Response {
                    reserve_secondary_click: reserve,
                    ..Response::default()
                }
            }
            Button::Primary if count >= 2 => {
                if self.state != EditState::ConstructingCurve
                    && let Some(key) = curve_for_point(&self.registry, area)
                {
                    self.registry.remove(key);
                }
                Response::default()
            }
            Button::Primary => {
                self.primary_click(at, area, modifiers);
                Response::default()
            }
        }
    }

    fn primary_click(&mut self, at: Point, area: Rect, modifiers: Modifiers) {
        if self.state == EditState::ConstructingCurve {
            let simple = self
                .registry
                .construction()
                .is_some_and(|c| !c.kind.is_complex());
            if simple {
                let modifiers = self.effective(modifiers);
                self.registry.extend_construction(at, modifiers);
                self.finish();
            }
            return;
        }

        let hit = hit_test(&self.registry, area);
        let reshaped = match hit {
            Hit::Miss => {
                self.begin(at);
                return;
            }
            Hit::Anchor(AnchorRef {
                key,
                kind: AnchorKind::Vertex(index),
            }) if modifiers.alt => self.reshape(key, |curve| curve.remove_vertex(index)),
            Hit::Body(key) if modifiers.shift => self.reshape(key, |curve| {
                nearest_segment(curve, at)
                    .is_some_and(|(segment, point)| curve.insert_vertex(segment + 1, point))
            }),
            _ => false,
        };
        if !reshaped && let Some(key) = hit.key() {
            self.registry.toggle_highlighted(key);
        }
    }

    // ─── Helpers ─────────────────────────────────────────────────────────

    /// Follow construction changes made directly on the registry.
    fn sync_state(&mut self) {
        match (self.state, self.registry.is_constructing()) {
            (EditState::ConstructingCurve, false) => self.state = EditState::Idle,
            (EditState::Idle, true) => self.state = EditState::ConstructingCurve,
            _ => {}
        }
    }

    fn begin(&mut self, at: Point) {
        match self.registry.begin_construction(at, self.kind) {
            Ok(key) => {
                log::debug!("constructing curve {key}");
                self.state = EditState::ConstructingCurve;
            }
            Err(err) => log::warn!("cannot begin curve: {err}"),
        }
    }

    fn finish(&mut self) {
        if let Some(key) = self.registry.finish_construction() {
            log::debug!("finished curve {key}");
        }
        self.state = EditState::Idle;
    }

    fn catch(&mut self, at: Point) {
        self.drag_origin = at;
        self.last = at;
    }

    /// Apply a structural edit to a reshapable curve and re-register it.
    fn reshape(&mut self, key: CurveKey, edit: impl FnOnce(&mut Curve) -> bool) -> bool {
        let Some(mut curve) = self
            .registry
            .get(key)
            .filter(|c| c.kind.reshapes_on_click())
            .cloned()
        else {
            return false;
        };
        if !edit(&mut curve) {
            return false;
        }
        log::debug!("reshaped curve {key} to {} vertices", curve.len());
        match self.registry.add_or_replace(curve) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("cannot reshape curve {key}: {err}");
                false
            }
        }
    }

    fn effective(&self, modifiers: Modifiers) -> Modifiers {
        Modifiers {
            shift: modifiers.shift && self.config.constrain_with_shift,
            ..modifiers
        }
    }

    /// Offset since the last applied drag position, with Shift locking
    /// the total displacement to the dominant axis.
    fn drag_delta(&mut self, at: Point, modifiers: Modifiers) -> Vec2 {
        let target = if self.effective(modifiers).shift {
            constrain_to_axis(self.drag_origin, at)
        } else {
            at
        };
        let delta = target - self.last;
        self.last = target;
        delta
    }

    fn reserves_secondary_click(&self, area: Rect) -> bool {
        self.registry
            .construction()
            .is_some_and(|c| c.kind.is_complex())
            && construction_hot_zone(&self.registry, area)
    }

    /// Cursor previewing what a press at `area` would catch.
    fn hover_cursor(&self, area: Rect) -> Option<Cursor> {
        match hit_test(&self.registry, area) {
            Hit::Anchor(anchor) => Some(self.anchor_cursor(anchor)),
            Hit::Body(_) => Some(Cursor::Move),
            Hit::Miss => None,
        }
    }

    fn anchor_cursor(&self, anchor: AnchorRef) -> Cursor {
        match anchor.kind {
            AnchorKind::Vertex(_) => Cursor::ResizeAll,
            AnchorKind::WholeCurve => Cursor::Move,
            AnchorKind::Edge(index) => self
                .registry
                .get(anchor.key)
                .and_then(|c| c.segment(index))
                .map_or(Cursor::ResizeAll, edge_cursor),
        }
    }
}

impl InputHandler for CurveEditor {
    fn handle(&mut self, event: &InputEvent, claims: &Claims) -> Response {
        // A higher-priority handler owns this drag.
        if matches!(event, InputEvent::Drag { .. }) && claims.drag.is_some() {
            return Response::default();
        }
        self.on_event(event)
    }
}

fn drag_anchor(curve: &mut Curve, kind: AnchorKind, delta: Vec2) {
    match kind {
        AnchorKind::Vertex(index) => {
            if let Some(point) = curve.vertices.get(index).map(|v| v.point) {
                curve.move_vertex(index, point + delta);
            }
        }
        AnchorKind::Edge(index) => {
            let delta = curve
                .segment(index)
                .map_or(delta, |segment| along_normal(segment, delta));
            curve.move_edge(index, delta);
        }
        AnchorKind::WholeCurve => curve.translate(delta),
    }
}

/// Component of `delta` perpendicular to `segment`.
fn along_normal(segment: Line, delta: Vec2) -> Vec2 {
    let d = segment.p1 - segment.p0;
    let length = d.hypot();
    if length == 0.0 {
        return delta;
    }
    let normal = Vec2::new(-d.y, d.x) / length;
    normal * delta.dot(normal)
}

/// Resize cursor along the dominant axis of the edge normal.
fn edge_cursor(segment: Line) -> Cursor {
    let d = segment.p1 - segment.p0;
    if d.x.abs() >= d.y.abs() {
        Cursor::ResizeVertical
    } else {
        Cursor::ResizeHorizontal
    }
}
