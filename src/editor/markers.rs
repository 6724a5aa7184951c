//! Arena of opaque marker handles, one per editable vertex
//!
//! The editor owns the handles; the host maps them to whatever marker
//! primitive it renders. Handles are created when editing is enabled,
//! released on disable, and resynced whenever the path length changes.
//! A handle is never reused after release, so stale host-side references
//! can be detected by identity.

/// Opaque handle identifying one editable vertex marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerId(u64);

#[derive(Debug, Default)]
pub(crate) struct MarkerArena {
    next_id: u64,
    handles: Vec<MarkerId>,
}

impl MarkerArena {
    /// Create one fresh handle per vertex, releasing any existing ones
    pub fn materialize(&mut self, vertex_count: usize) {
        self.handles.clear();
        self.handles.reserve(vertex_count);
        for _ in 0..vertex_count {
            self.handles.push(MarkerId(self.next_id));
            self.next_id += 1;
        }
    }

    /// Release every handle
    pub fn release_all(&mut self) {
        self.handles.clear();
    }

    /// Grow or shrink the arena to match a new vertex count
    ///
    /// Surviving vertices keep their handles; removed ones are released and
    /// added ones get fresh handles.
    pub fn sync_len(&mut self, vertex_count: usize) {
        while self.handles.len() > vertex_count {
            self.handles.pop();
        }
        while self.handles.len() < vertex_count {
            self.handles.push(MarkerId(self.next_id));
            self.next_id += 1;
        }
    }

    /// Handles indexed by vertex position
    pub fn handles(&self) -> &[MarkerId] {
        &self.handles
    }
}
