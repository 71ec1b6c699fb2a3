use bytes::Bytes;
use worksync_types::{Checksum, ContentHasher};

/// An immutable leaf payload: source text, an additional document's text, or
/// a serialized reference descriptor.
///
/// The checksum is computed once at construction and carried with the bytes,
/// so content comparison during synchronization never re-reads the payload.
/// Cloning shares the underlying buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Content {
    bytes: Bytes,
    checksum: Checksum,
}

impl Content {
    /// Create content from raw bytes, computing its checksum.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let checksum = ContentHasher::CONTENT.hash(&bytes);
        Self { bytes, checksum }
    }

    /// Reassemble content fetched during synchronization.
    ///
    /// The checksum is taken as given: the bytes were fetched under it, so
    /// the pairing is correct by construction.
    pub fn from_parts(bytes: Bytes, checksum: Checksum) -> Self {
        Self { bytes, checksum }
    }

    /// The raw payload.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The content checksum.
    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
