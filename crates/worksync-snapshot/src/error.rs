use thiserror::Error;
use worksync_types::{DocumentId, ProjectId};

/// Errors from snapshot construction and edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("duplicate project {0}")]
    DuplicateProject(ProjectId),

    #[error("duplicate document {0}")]
    DuplicateDocument(DocumentId),

    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),
}

/// Result alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
