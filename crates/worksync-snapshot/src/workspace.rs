use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use worksync_assets::{AssetPayload, WorkspaceDescriptor};
use worksync_types::{Checksum, DocumentId, ProjectId};

use crate::content::Content;
use crate::document::Document;
use crate::error::{SnapshotError, SnapshotResult};
use crate::project::Project;

/// One immutable version of the entire synchronized workspace state.
///
/// Cloning a snapshot is cheap (it shares the root). Every edit operation
/// returns a new snapshot that shares all unaffected projects and documents
/// with its parent by `Arc`: the persistent-data-structure semantics the
/// incremental checksum tree depends on. Old snapshots stay fully usable for
/// as long as anyone holds them.
#[derive(Clone, Debug)]
pub struct WorkspaceSnapshot {
    root: Arc<Root>,
}

#[derive(Debug)]
struct Root {
    projects: Vec<Arc<Project>>,
    checksum: OnceLock<Checksum>,
}

impl WorkspaceSnapshot {
    /// The empty workspace.
    pub fn empty() -> Self {
        Self {
            root: Arc::new(Root {
                projects: Vec::new(),
                checksum: OnceLock::new(),
            }),
        }
    }

    /// Create a snapshot from an ordered project list.
    pub fn new(projects: Vec<Arc<Project>>) -> SnapshotResult<Self> {
        for (index, project) in projects.iter().enumerate() {
            if projects[..index].iter().any(|p| p.id() == project.id()) {
                return Err(SnapshotError::DuplicateProject(project.id()));
            }
        }
        Ok(Self::from_projects(projects))
    }

    /// Reassemble a snapshot from synchronized parts. The root checksum is
    /// taken as given: the project list was resolved from the descriptor
    /// fetched under it, so the root is correct by construction and is never
    /// re-hashed to verify.
    pub fn from_descriptor(projects: Vec<Arc<Project>>, checksum: Checksum) -> Self {
        Self {
            root: Arc::new(Root {
                projects,
                checksum: OnceLock::from(checksum),
            }),
        }
    }

    fn from_projects(projects: Vec<Arc<Project>>) -> Self {
        Self {
            root: Arc::new(Root {
                projects,
                checksum: OnceLock::new(),
            }),
        }
    }

    /// The ordered projects of this snapshot.
    pub fn projects(&self) -> &[Arc<Project>] {
        &self.root.projects
    }

    /// Returns `true` if the snapshot has no projects.
    pub fn is_empty(&self) -> bool {
        self.root.projects.is_empty()
    }

    /// Look up a project by identity.
    pub fn find_project(&self, id: ProjectId) -> Option<&Arc<Project>> {
        self.root.projects.iter().find(|p| p.id() == id)
    }

    /// Look up a document by identity, returning its owning project too.
    pub fn find_document(&self, id: DocumentId) -> Option<(&Arc<Project>, &Arc<Document>)> {
        self.root.projects.iter().find_map(|project| {
            project.find_document(id).map(|document| (project, document))
        })
    }

    /// The descriptor that travels as the root asset.
    pub fn descriptor(&self) -> WorkspaceDescriptor {
        WorkspaceDescriptor {
            projects: self.root.projects.iter().map(|p| p.checksum()).collect(),
        }
    }

    /// The root checksum, memoized. Recursively hashes bottom-up on first
    /// use; unchanged subtrees answer from their own memoized checksums.
    pub fn checksum(&self) -> Checksum {
        *self
            .root
            .checksum
            .get_or_init(|| self.descriptor().checksum())
    }

    // -----------------------------------------------------------------------
    // Edits: each returns a derived snapshot sharing unaffected subtrees
    // -----------------------------------------------------------------------

    /// A snapshot with a project appended.
    pub fn add_project(&self, project: Arc<Project>) -> SnapshotResult<Self> {
        if self.find_project(project.id()).is_some() {
            return Err(SnapshotError::DuplicateProject(project.id()));
        }
        let mut projects = self.root.projects.clone();
        projects.push(project);
        Ok(Self::from_projects(projects))
    }

    /// A snapshot with the identified project removed.
    pub fn remove_project(&self, id: ProjectId) -> SnapshotResult<Self> {
        if self.find_project(id).is_none() {
            return Err(SnapshotError::ProjectNotFound(id));
        }
        let projects = self
            .root
            .projects
            .iter()
            .filter(|p| p.id() != id)
            .cloned()
            .collect();
        Ok(Self::from_projects(projects))
    }

    /// A snapshot with one document's content replaced. Rebuilds exactly the
    /// document, its project, and the root; every other node is shared.
    pub fn with_document_text(
        &self,
        id: DocumentId,
        text: impl Into<Bytes>,
    ) -> SnapshotResult<Self> {
        let (project, document) = self
            .find_document(id)
            .ok_or(SnapshotError::DocumentNotFound(id))?;
        let edited = Arc::new(document.with_content(Content::new(text.into())));
        let updated = project
            .with_document_replaced(edited)
            .map(Arc::new)
            .ok_or(SnapshotError::DocumentNotFound(id))?;
        Ok(self.with_project_swapped(updated))
    }

    /// A snapshot with a document added to the identified project.
    pub fn with_document_added(
        &self,
        project_id: ProjectId,
        document: Arc<Document>,
    ) -> SnapshotResult<Self> {
        if self.find_document(document.id()).is_some() {
            return Err(SnapshotError::DuplicateDocument(document.id()));
        }
        let project = self
            .find_project(project_id)
            .ok_or(SnapshotError::ProjectNotFound(project_id))?;
        let updated = Arc::new(project.with_document_appended(document));
        Ok(self.with_project_swapped(updated))
    }

    /// A snapshot with the identified document removed from its project.
    pub fn with_document_removed(&self, id: DocumentId) -> SnapshotResult<Self> {
        let (project, _) = self
            .find_document(id)
            .ok_or(SnapshotError::DocumentNotFound(id))?;
        let updated = project
            .with_document_removed(id)
            .map(Arc::new)
            .ok_or(SnapshotError::DocumentNotFound(id))?;
        Ok(self.with_project_swapped(updated))
    }

    /// Replace the project with `updated`'s identity, keeping order and
    /// sharing every other project.
    fn with_project_swapped(&self, updated: Arc<Project>) -> Self {
        let projects = self
            .root
            .projects
            .iter()
            .map(|p| {
                if p.id() == updated.id() {
                    Arc::clone(&updated)
                } else {
                    Arc::clone(p)
                }
            })
            .collect();
        Self::from_projects(projects)
    }

    // -----------------------------------------------------------------------
    // Asset enumeration
    // -----------------------------------------------------------------------

    /// Every asset reachable from this snapshot, keyed by checksum: content
    /// blobs, document and project descriptors, and the root descriptor.
    /// Shared content appears once (the map deduplicates by checksum).
    pub fn asset_map(&self) -> HashMap<Checksum, AssetPayload> {
        let mut assets = HashMap::new();
        for project in self.projects() {
            for document in project.all_documents() {
                let content = document.content();
                assets.insert(
                    content.checksum(),
                    AssetPayload::Content(content.bytes().clone()),
                );
                assets.insert(
                    document.checksum(),
                    AssetPayload::Document(document.descriptor()),
                );
            }
            for reference in project
                .metadata_references()
                .iter()
                .chain(project.analyzer_references())
            {
                assets.insert(
                    reference.checksum(),
                    AssetPayload::Content(reference.bytes().clone()),
                );
            }
            assets.insert(
                project.checksum(),
                AssetPayload::Project(project.descriptor()),
            );
        }
        assets.insert(self.checksum(), AssetPayload::Workspace(self.descriptor()));
        assets
    }
}

impl Default for WorkspaceSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
