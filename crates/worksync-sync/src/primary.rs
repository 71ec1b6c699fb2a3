use std::sync::RwLock;

use tracing::debug;
use worksync_snapshot::WorkspaceSnapshot;

/// Process-wide, single-writer holder of the current workspace snapshot.
///
/// This is the only process-wide mutable cell in the engine. It is an
/// explicit object injected into whatever needs current state; there is no
/// ambient singleton. Publishing is atomic: readers observe either the old
/// snapshot or the new one, never a partial update, and anything still
/// holding an old snapshot keeps using it safely (snapshots are immutable).
///
/// States: empty until the first synchronization, then populated, with every
/// subsequent publish a self-transition to a new snapshot value.
pub struct PrimaryWorkspace {
    current: RwLock<Option<WorkspaceSnapshot>>,
}

impl PrimaryWorkspace {
    /// Create an empty holder.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// The current snapshot, if one has been published.
    pub fn current(&self) -> Option<WorkspaceSnapshot> {
        self.current.read().expect("lock poisoned").clone()
    }

    /// Returns `true` once a snapshot has been published.
    pub fn is_populated(&self) -> bool {
        self.current.read().expect("lock poisoned").is_some()
    }

    /// Atomically swap in a fully-reconciled snapshot as current.
    pub fn publish(&self, snapshot: WorkspaceSnapshot) {
        let root = snapshot.checksum();
        *self.current.write().expect("lock poisoned") = Some(snapshot);
        debug!(root = %root.short_hex(), "published primary workspace");
    }
}

impl Default for PrimaryWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PrimaryWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimaryWorkspace")
            .field("populated", &self.is_populated())
            .finish()
    }
}
