use std::collections::HashMap;
use std::sync::RwLock;

use worksync_types::{Checksum, SessionId};

use crate::error::{AssetError, AssetResult};
use crate::payload::{AssetKind, AssetPayload};

/// Ownership scope of a stored asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetScope {
    /// Belongs to one synchronization session; dropped when it ends.
    Session(SessionId),
    /// Process-wide; shared across sessions and never dropped with one.
    Global,
}

struct AssetEntry {
    payload: AssetPayload,
    scope: AssetScope,
}

/// Process-wide, checksum-keyed asset cache.
///
/// All entries are held in memory behind a `RwLock`, so concurrent `put` and
/// `try_get` from multiple synchronization sessions are safe without caller
/// locking. Assets are write-once: a checksum never maps to two different
/// payloads, and `put` enforces this.
pub struct AssetStore {
    entries: RwLock<HashMap<Checksum, AssetEntry>>,
}

impl AssetStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Insert an asset under its checksum.
    ///
    /// Idempotent: re-putting an equal payload is a no-op and keeps the
    /// original scope (a session re-put never demotes a global asset).
    /// Re-putting a different payload under the same checksum fails with
    /// [`AssetError::IntegrityViolation`].
    pub fn put(
        &self,
        checksum: Checksum,
        payload: AssetPayload,
        scope: AssetScope,
    ) -> AssetResult<()> {
        if checksum.is_null() {
            return Err(AssetError::NullChecksum);
        }
        let mut entries = self.entries.write().expect("lock poisoned");
        match entries.entry(checksum) {
            std::collections::hash_map::Entry::Occupied(existing) => {
                if existing.get().payload != payload {
                    return Err(AssetError::IntegrityViolation { checksum });
                }
                Ok(())
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(AssetEntry { payload, scope });
                Ok(())
            }
        }
    }

    /// Look up an asset by checksum.
    pub fn try_get(&self, checksum: &Checksum) -> Option<AssetPayload> {
        let entries = self.entries.read().expect("lock poisoned");
        entries.get(checksum).map(|entry| entry.payload.clone())
    }

    /// Check whether an asset exists in the store.
    pub fn contains(&self, checksum: &Checksum) -> bool {
        let entries = self.entries.read().expect("lock poisoned");
        entries.contains_key(checksum)
    }

    /// All global-scope assets of the given kind, sorted by checksum for
    /// deterministic enumeration. Session-scoped assets are never returned.
    pub fn global_assets_of(&self, kind: AssetKind) -> Vec<(Checksum, AssetPayload)> {
        let entries = self.entries.read().expect("lock poisoned");
        let mut assets: Vec<(Checksum, AssetPayload)> = entries
            .iter()
            .filter(|(_, entry)| {
                entry.scope == AssetScope::Global && entry.payload.kind() == kind
            })
            .map(|(checksum, entry)| (*checksum, entry.payload.clone()))
            .collect();
        assets.sort_by_key(|(checksum, _)| *checksum);
        assets
    }

    /// Drop every asset scoped to the given session. Global assets are
    /// unaffected. Returns the number of assets released.
    pub fn release_session(&self, session: SessionId) -> usize {
        let mut entries = self.entries.write().expect("lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.scope != AssetScope::Session(session));
        before - entries.len()
    }

    /// Number of assets currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored payloads.
    pub fn total_bytes(&self) -> u64 {
        self.entries
            .read()
            .expect("lock poisoned")
            .values()
            .map(|entry| entry.payload.size())
            .sum()
    }

    /// Remove all assets from the store.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }

    /// Return a sorted list of all checksums in the store.
    pub fn all_checksums(&self) -> Vec<Checksum> {
        let entries = self.entries.read().expect("lock poisoned");
        let mut checksums: Vec<Checksum> = entries.keys().copied().collect();
        checksums.sort();
        checksums
    }
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("asset_count", &self.len())
            .finish()
    }
}
