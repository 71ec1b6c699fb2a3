use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use worksync_assets::{
    AssetKind, AssetPayload, AssetScope, AssetStore, DocumentDescriptor, ProjectDescriptor,
    WorkspaceDescriptor,
};
use worksync_types::{Checksum, SessionId};

use crate::error::{SyncError, SyncResult};
use crate::source::AssetSource;

/// Session-scoped fetch-through cache over the asset store.
///
/// `resolve` answers from the store when it can; otherwise it observes
/// cancellation, fetches from the source, and caches the payload under this
/// session's scope so a failed or cancelled session can be cleaned up
/// without touching other sessions' assets.
pub struct AssetProvider {
    store: Arc<AssetStore>,
    source: Arc<dyn AssetSource>,
    session: SessionId,
    fetched: AtomicUsize,
}

impl AssetProvider {
    pub fn new(store: Arc<AssetStore>, source: Arc<dyn AssetSource>, session: SessionId) -> Self {
        Self {
            store,
            source,
            session,
            fetched: AtomicUsize::new(0),
        }
    }

    /// The session this provider caches under.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Number of assets fetched from the source so far (store hits excluded).
    pub fn fetched(&self) -> usize {
        self.fetched.load(Ordering::Relaxed)
    }

    /// Resolve a checksum to its payload: store first, then the source.
    pub async fn resolve(
        &self,
        checksum: Checksum,
        cancel: &CancellationToken,
    ) -> SyncResult<AssetPayload> {
        if let Some(payload) = self.store.try_get(&checksum) {
            return Ok(payload);
        }
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }
        let payload = self.source.fetch_asset(checksum).await?;
        self.store
            .put(checksum, payload.clone(), AssetScope::Session(self.session))?;
        self.fetched.fetch_add(1, Ordering::Relaxed);
        Ok(payload)
    }

    /// Resolve a checksum that must be a workspace descriptor.
    pub async fn resolve_workspace(
        &self,
        checksum: Checksum,
        cancel: &CancellationToken,
    ) -> SyncResult<WorkspaceDescriptor> {
        match self.resolve(checksum, cancel).await? {
            AssetPayload::Workspace(descriptor) => Ok(descriptor),
            _ => Err(SyncError::MalformedAsset {
                checksum,
                expected: AssetKind::Workspace,
            }),
        }
    }

    /// Resolve a checksum that must be a project descriptor.
    pub async fn resolve_project(
        &self,
        checksum: Checksum,
        cancel: &CancellationToken,
    ) -> SyncResult<ProjectDescriptor> {
        match self.resolve(checksum, cancel).await? {
            AssetPayload::Project(descriptor) => Ok(descriptor),
            _ => Err(SyncError::MalformedAsset {
                checksum,
                expected: AssetKind::Project,
            }),
        }
    }

    /// Resolve a checksum that must be a document descriptor.
    pub async fn resolve_document(
        &self,
        checksum: Checksum,
        cancel: &CancellationToken,
    ) -> SyncResult<DocumentDescriptor> {
        match self.resolve(checksum, cancel).await? {
            AssetPayload::Document(descriptor) => Ok(descriptor),
            _ => Err(SyncError::MalformedAsset {
                checksum,
                expected: AssetKind::Document,
            }),
        }
    }

    /// Resolve a checksum that must be leaf content.
    pub async fn resolve_content(
        &self,
        checksum: Checksum,
        cancel: &CancellationToken,
    ) -> SyncResult<Bytes> {
        match self.resolve(checksum, cancel).await? {
            AssetPayload::Content(bytes) => Ok(bytes),
            _ => Err(SyncError::MalformedAsset {
                checksum,
                expected: AssetKind::Content,
            }),
        }
    }
}

impl std::fmt::Debug for AssetProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetProvider")
            .field("session", &self.session)
            .field("fetched", &self.fetched())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SnapshotAssetSource;

    fn provider_with(payload: AssetPayload) -> (AssetProvider, Checksum, Arc<AssetStore>) {
        let store = Arc::new(AssetStore::new());
        let source = Arc::new(SnapshotAssetSource::new());
        let checksum = source.register(payload);
        let provider = AssetProvider::new(Arc::clone(&store), source, SessionId::new());
        (provider, checksum, store)
    }

    #[tokio::test]
    async fn resolve_fetches_then_caches() {
        let (provider, checksum, store) =
            provider_with(AssetPayload::Content(Bytes::from_static(b"cached")));
        let cancel = CancellationToken::new();

        let first = provider.resolve(checksum, &cancel).await.unwrap();
        assert_eq!(provider.fetched(), 1);
        assert!(store.contains(&checksum));

        // Second resolve answers from the store without fetching.
        let second = provider.resolve(checksum, &cancel).await.unwrap();
        assert_eq!(provider.fetched(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn resolve_missing_asset_fails() {
        let store = Arc::new(AssetStore::new());
        let source = Arc::new(SnapshotAssetSource::new());
        let provider = AssetProvider::new(store, source, SessionId::new());
        let missing = Checksum::from_hash([3; 32]);

        let err = provider
            .resolve(missing, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::AssetNotFound(c) if c == missing));
    }

    #[tokio::test]
    async fn cancellation_is_observed_before_fetch() {
        let (provider, checksum, _) =
            provider_with(AssetPayload::Content(Bytes::from_static(b"never")));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = provider.resolve(checksum, &cancel).await.unwrap_err();
        assert!(matches!(err, SyncError::Cancelled));
        assert_eq!(provider.fetched(), 0);
    }

    #[tokio::test]
    async fn cached_assets_survive_cancellation_checks() {
        // A store hit is returned even under a cancelled token: no fetch
        // happens, so there is nothing to abort.
        let (provider, checksum, _) =
            provider_with(AssetPayload::Content(Bytes::from_static(b"hot")));
        let cancel = CancellationToken::new();
        provider.resolve(checksum, &cancel).await.unwrap();

        cancel.cancel();
        let payload = provider.resolve(checksum, &cancel).await.unwrap();
        assert_eq!(payload.checksum(), checksum);
    }

    #[tokio::test]
    async fn released_session_assets_are_refetched() {
        let (provider, checksum, store) =
            provider_with(AssetPayload::Content(Bytes::from_static(b"scoped")));
        let cancel = CancellationToken::new();

        provider.resolve(checksum, &cancel).await.unwrap();
        assert_eq!(store.release_session(provider.session()), 1);

        provider.resolve(checksum, &cancel).await.unwrap();
        assert_eq!(provider.fetched(), 2);
    }

    #[tokio::test]
    async fn typed_resolve_rejects_wrong_kind() {
        let (provider, checksum, _) =
            provider_with(AssetPayload::Content(Bytes::from_static(b"not a root")));
        let err = provider
            .resolve_workspace(checksum, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::MalformedAsset {
                expected: AssetKind::Workspace,
                ..
            }
        ));
    }
}
