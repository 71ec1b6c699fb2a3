//! Foundation types for worksync.
//!
//! This crate provides the identity and addressing types used throughout the
//! worksync system. Every other worksync crate depends on `worksync-types`.
//!
//! # Key Types
//!
//! - [`Checksum`] — Content-addressed identifier (BLAKE3 hash)
//! - [`ContentHasher`] — Domain-separated hasher, one domain per node kind
//! - [`ProjectId`] / [`DocumentId`] — Stable identity tokens that survive edits
//! - [`SessionId`] — Identifier for one synchronization session
//! - [`LanguageKind`] / [`DocumentKind`] — Entity attribute vocabulary

pub mod checksum;
pub mod error;
pub mod hasher;
pub mod identity;
pub mod kinds;

pub use checksum::Checksum;
pub use error::TypeError;
pub use hasher::ContentHasher;
pub use identity::{DocumentId, ProjectId, SessionId};
pub use kinds::{DocumentKind, LanguageKind};
