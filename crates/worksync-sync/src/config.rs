/// Configuration for the synchronization service.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Maximum number of checksums requested from the asset source in one
    /// batch when pre-populating global assets.
    pub fetch_batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fetch_batch_size: 32,
        }
    }
}
