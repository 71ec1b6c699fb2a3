use std::sync::{Arc, OnceLock};

use worksync_assets::ProjectDescriptor;
use worksync_types::{Checksum, DocumentId, LanguageKind, ProjectId};

use crate::content::Content;
use crate::document::Document;

/// An immutable project: ordered documents, leaf reference content, and
/// identity edges to sibling projects.
///
/// Shared between snapshots as `Arc<Project>`. Construction is staged:
/// `Project::new` creates an empty project and the `with_*` methods attach
/// children, resetting the checksum cache each time so a partially-built
/// project can never leak a stale checksum.
#[derive(Debug)]
pub struct Project {
    id: ProjectId,
    name: String,
    language: LanguageKind,
    documents: Vec<Arc<Document>>,
    additional_documents: Vec<Arc<Document>>,
    metadata_references: Vec<Content>,
    analyzer_references: Vec<Content>,
    project_references: Vec<ProjectId>,
    checksum: OnceLock<Checksum>,
}

impl Project {
    /// Create an empty project.
    pub fn new(id: ProjectId, name: impl Into<String>, language: LanguageKind) -> Self {
        Self {
            id,
            name: name.into(),
            language,
            documents: Vec::new(),
            additional_documents: Vec::new(),
            metadata_references: Vec::new(),
            analyzer_references: Vec::new(),
            project_references: Vec::new(),
            checksum: OnceLock::new(),
        }
    }

    pub fn with_documents(mut self, documents: Vec<Arc<Document>>) -> Self {
        self.documents = documents;
        self.checksum = OnceLock::new();
        self
    }

    pub fn with_additional_documents(mut self, documents: Vec<Arc<Document>>) -> Self {
        self.additional_documents = documents;
        self.checksum = OnceLock::new();
        self
    }

    pub fn with_metadata_references(mut self, references: Vec<Content>) -> Self {
        self.metadata_references = references;
        self.checksum = OnceLock::new();
        self
    }

    pub fn with_analyzer_references(mut self, references: Vec<Content>) -> Self {
        self.analyzer_references = references;
        self.checksum = OnceLock::new();
        self
    }

    pub fn with_project_references(mut self, references: Vec<ProjectId>) -> Self {
        self.project_references = references;
        self.checksum = OnceLock::new();
        self
    }

    /// Reassemble a project from a synchronized descriptor and its resolved
    /// children. The checksum is taken as given (correct by construction,
    /// never re-hashed to verify); child order follows the descriptor.
    pub fn from_descriptor(
        desc: ProjectDescriptor,
        documents: Vec<Arc<Document>>,
        additional_documents: Vec<Arc<Document>>,
        metadata_references: Vec<Content>,
        analyzer_references: Vec<Content>,
        checksum: Checksum,
    ) -> Self {
        Self {
            id: desc.id,
            name: desc.name,
            language: desc.language,
            documents,
            additional_documents,
            metadata_references,
            analyzer_references,
            project_references: desc.project_references,
            checksum: OnceLock::from(checksum),
        }
    }

    /// Stable identity token; survives edits.
    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> &LanguageKind {
        &self.language
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    pub fn additional_documents(&self) -> &[Arc<Document>] {
        &self.additional_documents
    }

    pub fn metadata_references(&self) -> &[Content] {
        &self.metadata_references
    }

    pub fn analyzer_references(&self) -> &[Content] {
        &self.analyzer_references
    }

    pub fn project_references(&self) -> &[ProjectId] {
        &self.project_references
    }

    /// All documents, source then additional, in order.
    pub fn all_documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.iter().chain(&self.additional_documents)
    }

    /// Look up a document (source or additional) by identity.
    pub fn find_document(&self, id: DocumentId) -> Option<&Arc<Document>> {
        self.all_documents().find(|doc| doc.id() == id)
    }

    /// The descriptor that travels as this project's asset.
    pub fn descriptor(&self) -> ProjectDescriptor {
        ProjectDescriptor {
            id: self.id,
            name: self.name.clone(),
            language: self.language.clone(),
            documents: self.documents.iter().map(|d| d.checksum()).collect(),
            additional_documents: self
                .additional_documents
                .iter()
                .map(|d| d.checksum())
                .collect(),
            metadata_references: self
                .metadata_references
                .iter()
                .map(|c| c.checksum())
                .collect(),
            analyzer_references: self
                .analyzer_references
                .iter()
                .map(|c| c.checksum())
                .collect(),
            project_references: self.project_references.clone(),
        }
    }

    /// The project checksum, memoized per node. Computing it for an
    /// unchanged project is O(1); after an edit only the path from the edit
    /// to the root is re-hashed.
    pub fn checksum(&self) -> Checksum {
        *self.checksum.get_or_init(|| self.descriptor().checksum())
    }

    /// A project with one document replaced (matched by identity in either
    /// document list). Returns `None` if no document has that identity.
    /// All other children are shared with `self`.
    pub(crate) fn with_document_replaced(&self, document: Arc<Document>) -> Option<Self> {
        let id = document.id();
        let mut documents = self.documents.clone();
        let mut additional = self.additional_documents.clone();
        let slot = documents
            .iter_mut()
            .chain(additional.iter_mut())
            .find(|doc| doc.id() == id)?;
        *slot = document;
        Some(self.rebuilt(documents, additional))
    }

    /// A project with a document appended to the list matching its kind.
    pub(crate) fn with_document_appended(&self, document: Arc<Document>) -> Self {
        let mut documents = self.documents.clone();
        let mut additional = self.additional_documents.clone();
        match document.kind() {
            worksync_types::DocumentKind::Source => documents.push(document),
            worksync_types::DocumentKind::Additional => additional.push(document),
        }
        self.rebuilt(documents, additional)
    }

    /// A project with the identified document removed from either list.
    /// Returns `None` if no document has that identity.
    pub(crate) fn with_document_removed(&self, id: DocumentId) -> Option<Self> {
        if self.find_document(id).is_none() {
            return None;
        }
        let documents = self
            .documents
            .iter()
            .filter(|doc| doc.id() != id)
            .cloned()
            .collect();
        let additional = self
            .additional_documents
            .iter()
            .filter(|doc| doc.id() != id)
            .cloned()
            .collect();
        Some(self.rebuilt(documents, additional))
    }

    fn rebuilt(&self, documents: Vec<Arc<Document>>, additional: Vec<Arc<Document>>) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            language: self.language.clone(),
            documents,
            additional_documents: additional,
            metadata_references: self.metadata_references.clone(),
            analyzer_references: self.analyzer_references.clone(),
            project_references: self.project_references.clone(),
            checksum: OnceLock::new(),
        }
    }
}
