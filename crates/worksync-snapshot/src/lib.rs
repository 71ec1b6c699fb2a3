//! Immutable workspace snapshots for worksync.
//!
//! A [`WorkspaceSnapshot`] is one version of the entire synchronized state:
//! an ordered list of projects, each owning ordered documents and leaf
//! content. Snapshots are persistent data structures: an edit produces a new
//! snapshot that shares every unaffected subtree with its parent by `Arc`
//! ownership. That sharing is what makes checksum recomputation and
//! synchronization incremental:
//!
//! - every node memoizes its checksum (valid forever, nodes never mutate),
//! - an edit re-hashes only the path from the edit to the root,
//! - a replica reuses unchanged subtrees by reference, preserving identity.
//!
//! The checksum of a node is defined over its descriptor (the same ordered
//! child checksums and attributes that travel as its asset during
//! synchronization), so owner and replica derive identical checksums from
//! identical logical content.

pub mod content;
pub mod diff;
pub mod document;
pub mod error;
pub mod project;
pub mod workspace;

pub use content::Content;
pub use diff::{diff_snapshots, DocumentChange, ProjectChange, WorkspaceDiff};
pub use document::Document;
pub use error::{SnapshotError, SnapshotResult};
pub use project::Project;
pub use workspace::WorkspaceSnapshot;
