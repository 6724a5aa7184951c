//! Interactive path-editing state machine
//!
//! [`PathEditor`] owns one mutable path plus its undo/redo history and marker
//! handles. The host supplies a [`ScreenProjection`] capability for pixel-space
//! proximity tests and receives every committed mutation through a change
//! callback. No operation here can raise: stale indices, empty stacks and
//! disabled-state calls are all no-ops.
//!
//! # States
//!
//! **disabled** ⇄ **enabled**; within enabled: idle, dragging (one vertex
//! moving live, history not yet pushed) and selected (one vertex flagged for
//! deletion). Disabling tears down markers, history, drag state and selection.

mod history;
mod markers;

use geo::Point;
use history::EditHistory;
pub use markers::MarkerId;
use markers::MarkerArena;

/// Pixel tolerance for adopting a snap candidate
pub const SNAP_TOLERANCE_PX: f32 = 10.0;

/// Pixel tolerance for inserting into a segment instead of appending
pub const INSERT_TOLERANCE_PX: f32 = 12.0;

/// A position in host screen space, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenPos {
    pub x: f32,
    pub y: f32,
}

impl ScreenPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean pixel distance to another position
    pub fn distance(&self, other: &ScreenPos) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Host-supplied projection between geographic and screen space
///
/// Any map implementation satisfying this capability can drive the editor;
/// the editor never depends on a concrete map library type.
pub trait ScreenProjection {
    fn project(&self, position: Point<f64>) -> ScreenPos;
    fn unproject(&self, pixel: ScreenPos) -> Point<f64>;
}

/// Explicit editor actions, typically mapped from host keyboard events
///
/// Replaces ambient event broadcasting: the host translates its own input
/// (Ctrl+Z, Delete, ...) into these and calls [`PathEditor::apply_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Undo,
    Redo,
    ToggleEnabled,
    DeleteSelected,
    ClearSelection,
}

/// Callback receiving the new path after every committed mutation
type ChangeCallback = Box<dyn FnMut(&[Point<f64>])>;

/// One in-flight drag gesture
#[derive(Debug)]
struct DragState {
    index: usize,
    /// Path as it was before the first move of the gesture
    origin: Vec<Point<f64>>,
}

/// State machine over one editable coordinate path
pub struct PathEditor {
    path: Vec<Point<f64>>,
    history: EditHistory,
    marker_arena: MarkerArena,
    enabled: bool,
    snap_enabled: bool,
    selected: Option<usize>,
    drag: Option<DragState>,
    /// Host-supplied auxiliary snap candidates (e.g. the other path)
    snap_candidates: Vec<Point<f64>>,
    on_change: Option<ChangeCallback>,
}

impl std::fmt::Debug for PathEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathEditor")
            .field("path_len", &self.path.len())
            .field("enabled", &self.enabled)
            .field("snap_enabled", &self.snap_enabled)
            .field("selected", &self.selected)
            .field("dragging", &self.drag.is_some())
            .finish()
    }
}

impl PathEditor {
    /// Create an editor over a path, initially disabled
    pub fn new(path: Vec<Point<f64>>) -> Self {
        Self {
            path,
            history: EditHistory::default(),
            marker_arena: MarkerArena::default(),
            enabled: false,
            snap_enabled: true,
            selected: None,
            drag: None,
            snap_candidates: Vec::new(),
            on_change: None,
        }
    }

    /// Register the host change callback
    pub fn set_on_change(&mut self, callback: impl FnMut(&[Point<f64>]) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// The current path
    pub fn path(&self) -> &[Point<f64>] {
        &self.path
    }

    /// Marker handles, one per vertex (empty while disabled)
    pub fn markers(&self) -> &[MarkerId] {
        self.marker_arena.handles()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Enable or disable editing
    ///
    /// Enabling materializes one marker per vertex. Disabling releases the
    /// markers and destroys the edit history, drag state and selection.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.marker_arena.materialize(self.path.len());
        } else {
            self.marker_arena.release_all();
            self.history.clear();
            self.drag = None;
            self.selected = None;
        }
    }

    pub fn set_snap(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    /// Replace the auxiliary snap candidates (e.g. the other path's vertices)
    pub fn set_snap_candidates(&mut self, candidates: Vec<Point<f64>>) {
        self.snap_candidates = candidates;
    }

    /// Host-imposed cap on undo depth; `None` (the default) is unbounded
    pub fn set_max_history_depth(&mut self, max_depth: Option<usize>) {
        self.history.set_max_depth(max_depth);
    }

    /// Flag one vertex for deletion; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) {
        if self.enabled && index < self.path.len() {
            self.selected = Some(index);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Live vertex move during a drag gesture
    ///
    /// Applies snap resolution each move and updates the coordinate in place.
    /// History is not pushed here; intermediate frames would flood the stack.
    pub fn drag(&mut self, index: usize, tentative: Point<f64>, projection: &dyn ScreenProjection) {
        if !self.enabled || index >= self.path.len() {
            return;
        }
        let gesture_matches = self.drag.as_ref().is_some_and(|d| d.index == index);
        if !gesture_matches {
            self.drag = Some(DragState {
                index,
                origin: self.path.clone(),
            });
        }
        self.path[index] = self.resolve_snap(tentative, Some(index), projection);
    }

    /// Commit a drag gesture
    ///
    /// Pushes the pre-drag snapshot onto the undo stack (clearing redo) and
    /// commits the final snapped coordinate.
    pub fn drag_end(
        &mut self,
        index: usize,
        final_position: Point<f64>,
        projection: &dyn ScreenProjection,
    ) {
        if !self.enabled || index >= self.path.len() {
            self.drag = None;
            return;
        }
        // drag_end without a preceding drag still commits one mutation
        let snapshot = match self.drag.take() {
            Some(gesture) if gesture.index == index => gesture.origin,
            _ => self.path.clone(),
        };
        self.path[index] = self.resolve_snap(final_position, Some(index), projection);
        self.history.record(snapshot);
        self.emit_change();
    }

    /// Insert a vertex into the nearest segment, or append to the end
    ///
    /// The click is projected onto every consecutive segment in pixel space;
    /// if the nearest projection is within [`INSERT_TOLERANCE_PX`] the vertex
    /// is inserted at that segment's ending index, otherwise appended.
    pub fn insert_or_append(&mut self, click: Point<f64>, projection: &dyn ScreenProjection) {
        if !self.enabled {
            return;
        }
        self.history.record(self.path.clone());

        let position = self.resolve_snap(click, None, projection);
        let insert_index = self.nearest_segment_insertion(position, projection);
        match insert_index {
            Some(index) => self.path.insert(index, position),
            None => self.path.push(position),
        }

        self.marker_arena.sync_len(self.path.len());
        self.emit_change();
    }

    /// Remove a vertex by index; out-of-range indices are a no-op
    pub fn delete_vertex(&mut self, index: usize) {
        if !self.enabled || index >= self.path.len() {
            return;
        }
        self.history.record(self.path.clone());
        self.path.remove(index);
        self.selected = None;
        self.marker_arena.sync_len(self.path.len());
        self.emit_change();
    }

    /// Remove the currently selected vertex; a no-op without a selection
    pub fn delete_selected(&mut self) {
        if let Some(index) = self.selected {
            self.delete_vertex(index);
        }
    }

    /// Restore the previous snapshot; a no-op when the undo stack is empty
    pub fn undo(&mut self) {
        if !self.enabled {
            return;
        }
        if let Some(snapshot) = self.history.undo(self.path.clone()) {
            self.apply_snapshot(snapshot);
        }
    }

    /// Reapply an undone snapshot; a no-op when the redo stack is empty
    pub fn redo(&mut self) {
        if !self.enabled {
            return;
        }
        if let Some(snapshot) = self.history.redo(self.path.clone()) {
            self.apply_snapshot(snapshot);
        }
    }

    /// Apply an explicit host action
    pub fn apply_action(&mut self, action: EditAction) {
        match action {
            EditAction::Undo => self.undo(),
            EditAction::Redo => self.redo(),
            EditAction::ToggleEnabled => self.set_enabled(!self.enabled),
            EditAction::DeleteSelected => self.delete_selected(),
            EditAction::ClearSelection => self.clear_selection(),
        }
    }

    fn apply_snapshot(&mut self, snapshot: Vec<Point<f64>>) {
        self.path = snapshot;
        self.drag = None;
        // A restored path invalidates any vertex selection
        self.selected = None;
        self.marker_arena.sync_len(self.path.len());
        self.emit_change();
    }

    /// Resolve a tentative coordinate against the snap candidates
    ///
    /// Candidates are the path's own vertices (minus the dragged one) plus the
    /// host-supplied auxiliaries. The pixel-nearest candidate is adopted only
    /// if it lies within [`SNAP_TOLERANCE_PX`]; otherwise the tentative
    /// coordinate is kept unchanged.
    fn resolve_snap(
        &self,
        tentative: Point<f64>,
        dragged_index: Option<usize>,
        projection: &dyn ScreenProjection,
    ) -> Point<f64> {
        if !self.snap_enabled {
            return tentative;
        }
        let pixel = projection.project(tentative);

        let own = self
            .path
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != dragged_index)
            .map(|(_, p)| p);
        let best = own
            .chain(self.snap_candidates.iter())
            .map(|candidate| (candidate, projection.project(*candidate).distance(&pixel)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match best {
            Some((candidate, distance)) if distance <= SNAP_TOLERANCE_PX => *candidate,
            _ => tentative,
        }
    }

    /// Ending index of the pixel-nearest segment within tolerance, if any
    fn nearest_segment_insertion(
        &self,
        position: Point<f64>,
        projection: &dyn ScreenProjection,
    ) -> Option<usize> {
        let pixel = projection.project(position);
        let mut best: Option<(usize, f32)> = None;

        for (i, pair) in self.path.windows(2).enumerate() {
            let a = projection.project(pair[0]);
            let b = projection.project(pair[1]);
            let distance = closest_point_on_segment(&pixel, &a, &b).distance(&pixel);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((i + 1, distance));
            }
        }

        match best {
            Some((index, distance)) if distance <= INSERT_TOLERANCE_PX => Some(index),
            _ => None,
        }
    }

    fn emit_change(&mut self) {
        if let Some(mut callback) = self.on_change.take() {
            callback(&self.path);
            self.on_change = Some(callback);
        }
    }
}

/// Closest point to `p` on the segment `a`..`b`, in pixel space
fn closest_point_on_segment(p: &ScreenPos, a: &ScreenPos, b: &ScreenPos) -> ScreenPos {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let length_squared = abx * abx + aby * aby;
    if length_squared <= f32::EPSILON {
        return *a;
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / length_squared).clamp(0.0, 1.0);
    ScreenPos::new(a.x + t * abx, a.y + t * aby)
}
