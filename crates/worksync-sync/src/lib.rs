//! Incremental synchronization engine for worksync.
//!
//! A replica reconciles its workspace against an owner's root checksum by
//! walking the checksum tree top-down: subtrees whose checksums already match
//! something held locally are reused by reference; everything else is fetched
//! by checksum from the owner's asset source and rebuilt. The result is a
//! snapshot whose root checksum equals the owner's by construction, sharing
//! every unchanged node with the previous snapshot so dependent caches keyed
//! by identity survive the update.
//!
//! # Components
//!
//! - [`AssetSource`] — outbound fetch interface to the owner (the only
//!   suspend point in a synchronization)
//! - [`AssetProvider`] — session-scoped fetch-through cache over the store
//! - [`WorkspaceReconciler`] — negotiation plus identity-preserving
//!   reconstruction
//! - [`PrimaryWorkspace`] — process-wide holder of the current snapshot with
//!   one atomic publish operation
//! - [`SyncService`] / [`SyncSession`] — the inbound operations:
//!   synchronize-primary-workspace and synchronize-global-assets

pub mod config;
pub mod error;
pub mod primary;
pub mod protocol;
pub mod provider;
pub mod reconciler;
pub mod service;
pub mod source;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use primary::PrimaryWorkspace;
pub use protocol::{SyncRequest, SyncResponse, PROTOCOL_VERSION};
pub use provider::AssetProvider;
pub use reconciler::{LanguageRegistry, ReconcileOutcome, SyncStats, WorkspaceReconciler};
pub use service::{SyncService, SyncSession};
pub use source::{AssetSource, SnapshotAssetSource};
