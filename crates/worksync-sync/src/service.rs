use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use worksync_assets::{AssetScope, AssetStore};
use worksync_types::{Checksum, SessionId};

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::primary::PrimaryWorkspace;
use crate::provider::AssetProvider;
use crate::reconciler::{LanguageRegistry, SyncStats, WorkspaceReconciler};
use crate::source::AssetSource;

/// The inbound synchronization surface of a replica process.
///
/// Owns the primary workspace holder and the shared asset store, and opens
/// one [`SyncSession`] per connected client. Sessions negotiate concurrently
/// against the same store and the same holder; each publish is atomic and
/// the last one wins.
pub struct SyncService {
    store: Arc<AssetStore>,
    source: Arc<dyn AssetSource>,
    registry: LanguageRegistry,
    config: SyncConfig,
    primary: Arc<PrimaryWorkspace>,
}

impl SyncService {
    pub fn new(
        store: Arc<AssetStore>,
        source: Arc<dyn AssetSource>,
        registry: LanguageRegistry,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            source,
            registry,
            config,
            primary: Arc::new(PrimaryWorkspace::new()),
        }
    }

    /// The primary workspace holder, for readers of current state.
    pub fn primary(&self) -> Arc<PrimaryWorkspace> {
        Arc::clone(&self.primary)
    }

    /// The shared asset store.
    pub fn store(&self) -> &Arc<AssetStore> {
        &self.store
    }

    /// Open a new synchronization session.
    pub fn open_session(&self) -> SyncSession {
        let id = SessionId::new();
        let provider = AssetProvider::new(Arc::clone(&self.store), Arc::clone(&self.source), id);
        debug!(session = %id.short_id(), "session opened");
        SyncSession {
            id,
            store: Arc::clone(&self.store),
            primary: Arc::clone(&self.primary),
            reconciler: WorkspaceReconciler::new(provider, self.registry.clone()),
            ordered: tokio::sync::Mutex::new(()),
        }
    }

    /// Pre-populate the store's global scope with the listed assets,
    /// independent of any snapshot. Checksums already present are skipped;
    /// the rest are fetched in batches.
    pub async fn synchronize_global_assets(
        &self,
        checksums: &[Checksum],
        cancel: &CancellationToken,
    ) -> SyncResult<usize> {
        let missing: Vec<Checksum> = checksums
            .iter()
            .copied()
            .filter(|checksum| !self.store.contains(checksum))
            .collect();

        let mut fetched = 0;
        for batch in missing.chunks(self.config.fetch_batch_size.max(1)) {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            let payloads = self.source.fetch_assets(batch).await?;
            for (&checksum, payload) in batch.iter().zip(payloads) {
                self.store.put(checksum, payload, AssetScope::Global)?;
                fetched += 1;
            }
        }
        debug!(requested = checksums.len(), fetched, "global assets synchronized");
        Ok(fetched)
    }
}

impl std::fmt::Debug for SyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncService")
            .field("store", &self.store)
            .field("primary", &self.primary)
            .finish()
    }
}

/// One client's synchronization session.
///
/// Calls on a single session are applied to the primary workspace in the
/// order they were issued (an internal mutex serializes them); calls from
/// different sessions interleave freely. Assets fetched by this session are
/// scoped to it and released when it finishes or a call fails.
pub struct SyncSession {
    id: SessionId,
    store: Arc<AssetStore>,
    primary: Arc<PrimaryWorkspace>,
    reconciler: WorkspaceReconciler,
    ordered: tokio::sync::Mutex<()>,
}

impl SyncSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Reconcile against the target root checksum and atomically publish the
    /// result as the current workspace.
    ///
    /// On any failure (including cancellation) nothing is published, the
    /// session's scoped assets are released, and the holder's current
    /// snapshot is left untouched. Retrying with the same target is safe.
    pub async fn synchronize_primary_workspace(
        &self,
        root: Checksum,
        cancel: &CancellationToken,
    ) -> SyncResult<SyncStats> {
        let _ordered = self.ordered.lock().await;
        let current = self.primary.current();
        match self
            .reconciler
            .reconcile(root, current.as_ref(), cancel)
            .await
        {
            Ok(outcome) => {
                self.primary.publish(outcome.snapshot);
                Ok(outcome.stats)
            }
            Err(err) => {
                let released = self.store.release_session(self.id);
                debug!(
                    session = %self.id.short_id(),
                    released,
                    error = %err,
                    "synchronization aborted"
                );
                Err(err)
            }
        }
    }

    /// Complete the session, releasing its scoped assets. Returns the number
    /// of assets released. Published snapshots are unaffected: they own
    /// their nodes directly.
    pub fn finish(self) -> usize {
        let released = self.store.release_session(self.id);
        debug!(session = %self.id.short_id(), released, "session finished");
        released
    }
}

impl std::fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSession").field("id", &self.id).finish()
    }
}
