//! Snapshot-based undo/redo stacks for the path editor
//!
//! Two plain stacks of full path snapshots. Recording a new mutation clears
//! the redo stack; branching history is not supported. An optional depth cap
//! evicts the oldest entries when exceeded (the host may impose one, none is
//! applied by default).

use geo::Point;

type Snapshot = Vec<Point<f64>>;

#[derive(Debug, Default)]
pub(crate) struct EditHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: Option<usize>,
}

impl EditHistory {
    /// Push a pre-mutation snapshot, clearing any redo branch
    pub fn record(&mut self, snapshot: Snapshot) {
        if let Some(cap) = self.max_depth
            && self.undo_stack.len() >= cap
        {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
    }

    /// Pop the undo stack, moving `current` onto the redo stack
    ///
    /// Returns the snapshot to apply, or `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Pop the redo stack, moving `current` onto the undo stack
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop both stacks entirely
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Cap the undo depth; `None` removes the cap
    pub fn set_max_depth(&mut self, max_depth: Option<usize>) {
        self.max_depth = max_depth;
        if let Some(cap) = max_depth {
            let excess = self.undo_stack.len().saturating_sub(cap);
            self.undo_stack.drain(..excess);
        }
    }
}
