//! Checksum-addressed assets for worksync.
//!
//! An asset is the materialized, transferable form of one node of the
//! workspace tree: a leaf content blob, a document/project/workspace
//! descriptor, or a globally shared payload. Every asset is keyed by its
//! checksum, and a checksum never maps to two different payloads; that
//! write-once invariant is what makes caching and cross-session sharing safe.
//!
//! # Asset Scopes
//!
//! - **Session** assets belong to one synchronization session and are dropped
//!   together when the session completes or is cancelled.
//! - **Global** assets are process-wide (e.g., shared compiler options) and
//!   survive session cleanup.

pub mod error;
pub mod payload;
pub mod store;

pub use error::{AssetError, AssetResult};
pub use payload::{
    AssetKind, AssetPayload, DocumentDescriptor, ProjectDescriptor, WorkspaceDescriptor,
};
pub use store::{AssetScope, AssetStore};
