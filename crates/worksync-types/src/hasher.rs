use crate::checksum::Checksum;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"worksync-content-v1"`) that is
/// prepended to every hash computation. This prevents cross-kind collisions:
/// a content blob and a document descriptor with identical bytes produce
/// different checksums.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for leaf content blobs (source text, reference payloads).
    pub const CONTENT: Self = Self {
        domain: "worksync-content-v1",
    };
    /// Hasher for document nodes.
    pub const DOCUMENT: Self = Self {
        domain: "worksync-document-v1",
    };
    /// Hasher for project nodes.
    pub const PROJECT: Self = Self {
        domain: "worksync-project-v1",
    };
    /// Hasher for the workspace root.
    pub const WORKSPACE: Self = Self {
        domain: "worksync-workspace-v1",
    };
    /// Hasher for globally shared option payloads.
    pub const OPTIONS: Self = Self {
        domain: "worksync-options-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> Checksum {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        Checksum::from_hash(*hasher.finalize().as_bytes())
    }

    /// Combine an ordered list of child checksums with node metadata.
    ///
    /// Order-sensitive: reordering children changes the result, since child
    /// order is semantically meaningful. The child count is folded in ahead
    /// of the children so a boundary between children and metadata cannot be
    /// confused. Pure and total; no error conditions.
    pub fn combine(&self, children: &[Checksum], metadata: &[u8]) -> Checksum {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(&(children.len() as u64).to_le_bytes());
        for child in children {
            hasher.update(child.as_bytes());
        }
        hasher.update(metadata);
        Checksum::from_hash(*hasher.finalize().as_bytes())
    }

    /// Verify that data produces the expected checksum.
    pub fn verify(&self, data: &[u8], expected: &Checksum) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
