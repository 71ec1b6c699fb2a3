use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use worksync_assets::AssetPayload;
use worksync_snapshot::WorkspaceSnapshot;
use worksync_types::Checksum;

use crate::error::{SyncError, SyncResult};

/// Outbound interface to the owner's asset store.
///
/// Asset retrieval is the only operation in a synchronization that may
/// suspend (network or cross-process fetch); everything else is CPU-bound.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch a single asset by checksum.
    async fn fetch_asset(&self, checksum: Checksum) -> SyncResult<AssetPayload>;

    /// Fetch multiple assets in a batch.
    ///
    /// Default implementation calls `fetch_asset` for each checksum.
    /// Transports may override to cut round-trips.
    async fn fetch_assets(&self, checksums: &[Checksum]) -> SyncResult<Vec<AssetPayload>> {
        let mut payloads = Vec::with_capacity(checksums.len());
        for &checksum in checksums {
            payloads.push(self.fetch_asset(checksum).await?);
        }
        Ok(payloads)
    }
}

/// In-process asset source serving from owner snapshots.
///
/// Intended for tests and same-process embedding: the owner registers each
/// snapshot's reachable assets (and any global payloads), and replicas fetch
/// from it like any remote source.
pub struct SnapshotAssetSource {
    assets: RwLock<HashMap<Checksum, AssetPayload>>,
}

impl SnapshotAssetSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self {
            assets: RwLock::new(HashMap::new()),
        }
    }

    /// Create a source pre-populated with everything reachable from the
    /// given snapshot.
    pub fn from_snapshot(snapshot: &WorkspaceSnapshot) -> Self {
        let source = Self::new();
        source.serve_snapshot(snapshot);
        source
    }

    /// Make every asset reachable from the snapshot fetchable. Assets are
    /// content-addressed, so serving overlapping snapshots is harmless.
    pub fn serve_snapshot(&self, snapshot: &WorkspaceSnapshot) {
        let mut assets = self.assets.write().expect("lock poisoned");
        assets.extend(snapshot.asset_map());
    }

    /// Register a standalone payload (e.g., shared compiler options) and
    /// return the checksum it is fetchable under.
    pub fn register(&self, payload: AssetPayload) -> Checksum {
        let checksum = payload.checksum();
        let mut assets = self.assets.write().expect("lock poisoned");
        assets.insert(checksum, payload);
        checksum
    }

    /// Number of fetchable assets.
    pub fn len(&self) -> usize {
        self.assets.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing is fetchable.
    pub fn is_empty(&self) -> bool {
        self.assets.read().expect("lock poisoned").is_empty()
    }
}

impl Default for SnapshotAssetSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetSource for SnapshotAssetSource {
    async fn fetch_asset(&self, checksum: Checksum) -> SyncResult<AssetPayload> {
        let assets = self.assets.read().expect("lock poisoned");
        assets
            .get(&checksum)
            .cloned()
            .ok_or(SyncError::AssetNotFound(checksum))
    }
}
