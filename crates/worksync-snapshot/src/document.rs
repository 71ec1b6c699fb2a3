use std::sync::OnceLock;

use worksync_assets::DocumentDescriptor;
use worksync_types::{Checksum, DocumentId, DocumentKind};

use crate::content::Content;

/// An immutable document: one versioned content payload plus attributes.
///
/// Documents are shared between snapshots as `Arc<Document>`; two snapshots
/// holding the same `Arc` hold the same logical document, unchanged. The
/// checksum is memoized on first use, which is always valid since a document
/// never changes once constructed.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    name: String,
    kind: DocumentKind,
    content: Content,
    checksum: OnceLock<Checksum>,
}

impl Document {
    /// Create a new document.
    pub fn new(
        id: DocumentId,
        name: impl Into<String>,
        kind: DocumentKind,
        content: Content,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            content,
            checksum: OnceLock::new(),
        }
    }

    /// Reassemble a document from a synchronized descriptor and its resolved
    /// content. The checksum is taken as given: the descriptor was fetched
    /// under it, so the node is correct by construction and is never
    /// re-hashed to verify.
    pub fn from_descriptor(desc: DocumentDescriptor, content: Content, checksum: Checksum) -> Self {
        debug_assert_eq!(desc.content, content.checksum());
        Self {
            id: desc.id,
            name: desc.name,
            kind: desc.kind,
            content,
            checksum: OnceLock::from(checksum),
        }
    }

    /// A document with the same identity and attributes but new content.
    /// The checksum cache starts empty; the edit re-hashes only this node
    /// and its ancestors.
    pub fn with_content(&self, content: Content) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            content,
            checksum: OnceLock::new(),
        }
    }

    /// Stable identity token; survives edits.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The descriptor that travels as this document's asset.
    pub fn descriptor(&self) -> DocumentDescriptor {
        DocumentDescriptor {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            content: self.content.checksum(),
        }
    }

    /// The document checksum, memoized per node.
    pub fn checksum(&self) -> Checksum {
        *self.checksum.get_or_init(|| self.descriptor().checksum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_document(text: &'static [u8]) -> Document {
        Document::new(
            DocumentId::new(),
            "Program.cs",
            DocumentKind::Source,
            Content::new(text),
        )
    }

    #[test]
    fn checksum_is_memoized_and_stable() {
        let doc = make_document(b"class C { }");
        assert_eq!(doc.checksum(), doc.checksum());
    }

    #[test]
    fn checksum_matches_descriptor() {
        let doc = make_document(b"class C { }");
        assert_eq!(doc.checksum(), doc.descriptor().checksum());
    }

    #[test]
    fn with_content_keeps_identity_and_changes_checksum() {
        let doc = make_document(b"before");
        let edited = doc.with_content(Content::new(&b"after"[..]));
        assert_eq!(doc.id(), edited.id());
        assert_eq!(doc.name(), edited.name());
        assert_ne!(doc.checksum(), edited.checksum());
    }

    #[test]
    fn from_descriptor_primes_the_checksum() {
        let original = make_document(b"synced text");
        let rebuilt = Document::from_descriptor(
            original.descriptor(),
            original.content().clone(),
            original.checksum(),
        );
        assert_eq!(rebuilt.checksum(), original.checksum());
        assert_eq!(rebuilt.id(), original.id());
        assert_eq!(rebuilt.content(), original.content());
    }

    #[test]
    fn same_text_different_identity_differs() {
        let a = make_document(b"shared text");
        let b = make_document(b"shared text");
        // Content is shared by checksum; the documents themselves are not.
        assert_eq!(a.content().checksum(), b.content().checksum());
        assert_ne!(a.checksum(), b.checksum());
    }
}
