use bytes::Bytes;
use serde::{Deserialize, Serialize};
use worksync_types::{Checksum, ContentHasher, DocumentId, DocumentKind, LanguageKind, ProjectId};

/// The kind of asset stored. Mirrors the [`AssetPayload`] variants so callers
/// can filter by tag without inspecting payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// Raw leaf bytes (source text, serialized reference payloads).
    Content,
    /// A document node descriptor.
    Document,
    /// A project node descriptor.
    Project,
    /// The workspace root descriptor.
    Workspace,
    /// Globally shared compiler options.
    CompilerOptions,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Document => write!(f, "document"),
            Self::Project => write!(f, "project"),
            Self::Workspace => write!(f, "workspace"),
            Self::CompilerOptions => write!(f, "compiler-options"),
        }
    }
}

/// Descriptor for a document node: the ordered parts a replica needs to
/// rebuild the document. The document's checksum is computed over exactly
/// these parts, so the descriptor hashes to the checksum it is fetched under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub id: DocumentId,
    pub name: String,
    pub kind: DocumentKind,
    pub content: Checksum,
}

impl DocumentDescriptor {
    /// The document's checksum: its content checksum combined with its
    /// identity and attributes.
    pub fn checksum(&self) -> Checksum {
        let mut metadata = Vec::new();
        metadata.extend_from_slice(self.id.as_uuid().as_bytes());
        put_str(&mut metadata, &self.name);
        metadata.push(self.kind.tag());
        ContentHasher::DOCUMENT.combine(&[self.content], &metadata)
    }
}

/// Descriptor for a project node. Child checksum lists are ordered; order is
/// semantically meaningful and folded into the project checksum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub id: ProjectId,
    pub name: String,
    pub language: LanguageKind,
    pub documents: Vec<Checksum>,
    pub additional_documents: Vec<Checksum>,
    pub metadata_references: Vec<Checksum>,
    pub analyzer_references: Vec<Checksum>,
    /// Identity edges to sibling projects, resolved after all projects exist.
    pub project_references: Vec<ProjectId>,
}

impl ProjectDescriptor {
    /// The project's checksum: all child checksums in order, combined with
    /// identity, attributes, edges, and the per-section child counts (so
    /// section boundaries are unambiguous).
    pub fn checksum(&self) -> Checksum {
        let children: Vec<Checksum> = self
            .documents
            .iter()
            .chain(&self.additional_documents)
            .chain(&self.metadata_references)
            .chain(&self.analyzer_references)
            .copied()
            .collect();

        let mut metadata = Vec::new();
        metadata.extend_from_slice(self.id.as_uuid().as_bytes());
        put_str(&mut metadata, &self.name);
        metadata.push(self.language.tag());
        put_str(&mut metadata, self.language.name());
        for section in [
            &self.documents,
            &self.additional_documents,
            &self.metadata_references,
            &self.analyzer_references,
        ] {
            metadata.extend_from_slice(&(section.len() as u64).to_le_bytes());
        }
        metadata.extend_from_slice(&(self.project_references.len() as u64).to_le_bytes());
        for target in &self.project_references {
            metadata.extend_from_slice(target.as_uuid().as_bytes());
        }

        ContentHasher::PROJECT.combine(&children, &metadata)
    }
}

/// Descriptor for the workspace root: the ordered list of project checksums.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDescriptor {
    pub projects: Vec<Checksum>,
}

impl WorkspaceDescriptor {
    pub fn checksum(&self) -> Checksum {
        ContentHasher::WORKSPACE.combine(&self.projects, &[])
    }
}

/// A transferable asset payload, keyed by checksum in the asset store.
///
/// Tagged variants instead of runtime type queries: global-asset enumeration
/// filters by [`AssetKind`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetPayload {
    Content(Bytes),
    Document(DocumentDescriptor),
    Project(ProjectDescriptor),
    Workspace(WorkspaceDescriptor),
    CompilerOptions(Bytes),
}

impl AssetPayload {
    /// The variant tag of this payload.
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Content(_) => AssetKind::Content,
            Self::Document(_) => AssetKind::Document,
            Self::Project(_) => AssetKind::Project,
            Self::Workspace(_) => AssetKind::Workspace,
            Self::CompilerOptions(_) => AssetKind::CompilerOptions,
        }
    }

    /// The checksum this payload is addressed by.
    ///
    /// A pure function of the payload: identical payloads anywhere yield
    /// identical checksums.
    pub fn checksum(&self) -> Checksum {
        match self {
            Self::Content(bytes) => ContentHasher::CONTENT.hash(bytes),
            Self::Document(desc) => desc.checksum(),
            Self::Project(desc) => desc.checksum(),
            Self::Workspace(desc) => desc.checksum(),
            Self::CompilerOptions(bytes) => ContentHasher::OPTIONS.hash(bytes),
        }
    }

    /// Payload size in bytes. Descriptor variants report the size of their
    /// canonical encoding.
    pub fn size(&self) -> u64 {
        match self {
            Self::Content(bytes) | Self::CompilerOptions(bytes) => bytes.len() as u64,
            _ => serde_json::to_vec(self).map_or(0, |encoded| encoded.len() as u64),
        }
    }
}

/// Length-prefixed string encoding for checksum metadata.
fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(b: u8) -> Checksum {
        Checksum::from_hash([b; 32])
    }

    fn make_document() -> DocumentDescriptor {
        DocumentDescriptor {
            id: DocumentId::new(),
            name: "Program.cs".into(),
            kind: DocumentKind::Source,
            content: sum(1),
        }
    }

    fn make_project() -> ProjectDescriptor {
        ProjectDescriptor {
            id: ProjectId::new(),
            name: "App".into(),
            language: LanguageKind::CSharp,
            documents: vec![sum(1), sum(2)],
            additional_documents: vec![sum(3)],
            metadata_references: vec![sum(4)],
            analyzer_references: vec![],
            project_references: vec![],
        }
    }

    // -----------------------------------------------------------------------
    // Checksum derivation
    // -----------------------------------------------------------------------

    #[test]
    fn document_checksum_is_deterministic() {
        let desc = make_document();
        assert_eq!(desc.checksum(), desc.checksum());
    }

    #[test]
    fn document_checksum_covers_identity() {
        let mut a = make_document();
        let b = DocumentDescriptor {
            id: DocumentId::new(),
            ..a.clone()
        };
        assert_ne!(a.checksum(), b.checksum());
        a.name = "Other.cs".into();
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn document_checksum_covers_content() {
        let a = make_document();
        let b = DocumentDescriptor {
            content: sum(9),
            ..a.clone()
        };
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn project_checksum_is_order_sensitive() {
        let a = make_project();
        let mut b = a.clone();
        b.documents.reverse();
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn project_checksum_distinguishes_sections() {
        // The same child checksum in a different section must not collide.
        let a = ProjectDescriptor {
            documents: vec![sum(7)],
            additional_documents: vec![],
            ..make_project()
        };
        let b = ProjectDescriptor {
            documents: vec![],
            additional_documents: vec![sum(7)],
            ..a.clone()
        };
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn project_checksum_covers_edges() {
        let a = make_project();
        let mut b = a.clone();
        b.project_references.push(ProjectId::new());
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn workspace_checksum_is_order_sensitive() {
        let a = WorkspaceDescriptor {
            projects: vec![sum(1), sum(2)],
        };
        let b = WorkspaceDescriptor {
            projects: vec![sum(2), sum(1)],
        };
        assert_ne!(a.checksum(), b.checksum());
    }

    // -----------------------------------------------------------------------
    // Payload surface
    // -----------------------------------------------------------------------

    #[test]
    fn payload_kind_matches_variant() {
        let content = AssetPayload::Content(Bytes::from_static(b"text"));
        let document = AssetPayload::Document(make_document());
        let project = AssetPayload::Project(make_project());
        assert_eq!(content.kind(), AssetKind::Content);
        assert_eq!(document.kind(), AssetKind::Document);
        assert_eq!(project.kind(), AssetKind::Project);
    }

    #[test]
    fn identical_content_payloads_share_a_checksum() {
        let a = AssetPayload::Content(Bytes::from_static(b"identical"));
        let b = AssetPayload::Content(Bytes::from_static(b"identical"));
        assert_eq!(a.checksum(), b.checksum());
    }

    #[test]
    fn content_and_options_do_not_collide() {
        let bytes = Bytes::from_static(b"same bytes");
        let content = AssetPayload::Content(bytes.clone());
        let options = AssetPayload::CompilerOptions(bytes);
        assert_ne!(content.checksum(), options.checksum());
    }

    #[test]
    fn content_size_is_byte_length() {
        let payload = AssetPayload::Content(Bytes::from_static(b"12345"));
        assert_eq!(payload.size(), 5);
    }

    #[test]
    fn descriptor_serde_roundtrip() {
        let payload = AssetPayload::Project(make_project());
        let json = serde_json::to_vec(&payload).unwrap();
        let parsed: AssetPayload = serde_json::from_slice(&json).unwrap();
        assert_eq!(payload, parsed);
    }
}
