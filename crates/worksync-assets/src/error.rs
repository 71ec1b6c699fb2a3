use worksync_types::Checksum;

/// Errors from asset store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssetError {
    /// The same checksum was asserted to map to two different payloads.
    /// Fatal to the synchronization session: it indicates a bug or upstream
    /// corruption, and nothing cached under this checksum can be trusted.
    #[error("integrity violation: checksum {checksum} maps to conflicting payloads")]
    IntegrityViolation { checksum: Checksum },

    /// The requested asset was not found.
    #[error("asset not found: {0}")]
    NotFound(Checksum),

    /// Attempted to store an asset under the null checksum.
    #[error("cannot store asset under the null checksum")]
    NullChecksum,

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for asset store operations.
pub type AssetResult<T> = Result<T, AssetError>;
