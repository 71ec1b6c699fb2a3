use thiserror::Error;
use worksync_assets::{AssetError, AssetKind};
use worksync_types::{Checksum, ProjectId};

/// Errors from synchronization.
///
/// Every failure aborts the synchronize call without mutating shared state:
/// the primary workspace only ever observes fully-reconciled snapshots, and
/// the caller releases the session's scoped assets on the way out.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A required checksum could not be resolved locally or from the remote
    /// source. Retrying the whole synchronization is safe: a no-op target
    /// short-circuits before any fetch.
    #[error("asset not found: {0}")]
    AssetNotFound(Checksum),

    /// Cooperative cancellation observed mid-negotiation. Not a failure for
    /// metrics purposes; simply an aborted attempt.
    #[error("synchronization cancelled")]
    Cancelled,

    /// A project's language kind has no registered front end on this
    /// replica. The current snapshot is left untouched.
    #[error("no front end registered for language {0}")]
    UnknownLanguage(String),

    /// A project references a sibling that does not exist in the target.
    #[error("project {from} references unknown project {to}")]
    DanglingProjectReference { from: ProjectId, to: ProjectId },

    /// The payload fetched for a checksum is not the expected asset kind.
    /// Indicates corruption or a bug upstream.
    #[error("asset {checksum} is not a {expected} asset")]
    MalformedAsset {
        checksum: Checksum,
        expected: AssetKind,
    },

    /// Asset store failure. Carries the write-once integrity violation,
    /// which is fatal to the session.
    #[error("asset store error: {0}")]
    Store(#[from] AssetError),

    /// Transport-reported failure from the asset source.
    #[error("asset source error: {0}")]
    Source(String),
}

impl SyncError {
    /// Returns `true` for the write-once violation, which cannot be retried.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            Self::Store(AssetError::IntegrityViolation { .. })
        )
    }
}

/// Result alias for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;
