//! Snapshot-to-snapshot diff: compare two workspace versions and report which
//! projects and documents changed.
//!
//! Nodes are matched by identity token; change is detected by checksum
//! inequality. Synchronization itself never consumes a diff (it negotiates
//! from checksums alone); this is the owner-side reporting surface.

use std::collections::BTreeMap;
use std::sync::Arc;

use worksync_types::{Checksum, DocumentId, ProjectId};

use crate::document::Document;
use crate::project::Project;
use crate::workspace::WorkspaceSnapshot;

/// The result of comparing two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceDiff {
    /// Project-level changes between the old and new snapshots.
    pub changes: Vec<ProjectChange>,
}

impl WorkspaceDiff {
    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of project-level changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

/// A single project-level change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectChange {
    /// A project present only in the new snapshot.
    Added { id: ProjectId, checksum: Checksum },
    /// A project present only in the old snapshot.
    Removed { id: ProjectId, checksum: Checksum },
    /// The same logical project with a different checksum.
    Modified {
        id: ProjectId,
        old_checksum: Checksum,
        new_checksum: Checksum,
        documents: Vec<DocumentChange>,
    },
}

/// A single document-level change within a modified project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentChange {
    Added { id: DocumentId, checksum: Checksum },
    Removed { id: DocumentId, checksum: Checksum },
    Modified {
        id: DocumentId,
        old_checksum: Checksum,
        new_checksum: Checksum,
    },
}

/// Compare two snapshots. `None` for the old side means "empty workspace",
/// so a fresh snapshot diffs as all additions.
pub fn diff_snapshots(
    old: Option<&WorkspaceSnapshot>,
    new: &WorkspaceSnapshot,
) -> WorkspaceDiff {
    let old_projects = match old {
        Some(snapshot) => project_map(snapshot),
        None => BTreeMap::new(),
    };
    let new_projects = project_map(new);

    let mut changes = Vec::new();

    for (id, old_project) in &old_projects {
        match new_projects.get(id) {
            Some(new_project) => {
                if old_project.checksum() != new_project.checksum() {
                    changes.push(ProjectChange::Modified {
                        id: *id,
                        old_checksum: old_project.checksum(),
                        new_checksum: new_project.checksum(),
                        documents: diff_documents(old_project, new_project),
                    });
                }
            }
            None => changes.push(ProjectChange::Removed {
                id: *id,
                checksum: old_project.checksum(),
            }),
        }
    }

    for (id, new_project) in &new_projects {
        if !old_projects.contains_key(id) {
            changes.push(ProjectChange::Added {
                id: *id,
                checksum: new_project.checksum(),
            });
        }
    }

    WorkspaceDiff { changes }
}

fn project_map(snapshot: &WorkspaceSnapshot) -> BTreeMap<ProjectId, Arc<Project>> {
    snapshot
        .projects()
        .iter()
        .map(|p| (p.id(), Arc::clone(p)))
        .collect()
}

fn document_map(project: &Project) -> BTreeMap<DocumentId, Arc<Document>> {
    project
        .all_documents()
        .map(|d| (d.id(), Arc::clone(d)))
        .collect()
}

fn diff_documents(old: &Project, new: &Project) -> Vec<DocumentChange> {
    let old_documents = document_map(old);
    let new_documents = document_map(new);

    let mut changes = Vec::new();

    for (id, old_document) in &old_documents {
        match new_documents.get(id) {
            Some(new_document) => {
                if old_document.checksum() != new_document.checksum() {
                    changes.push(DocumentChange::Modified {
                        id: *id,
                        old_checksum: old_document.checksum(),
                        new_checksum: new_document.checksum(),
                    });
                }
            }
            None => changes.push(DocumentChange::Removed {
                id: *id,
                checksum: old_document.checksum(),
            }),
        }
    }

    for (id, new_document) in &new_documents {
        if !old_documents.contains_key(id) {
            changes.push(DocumentChange::Added {
                id: *id,
                checksum: new_document.checksum(),
            });
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Content;
    use worksync_types::{DocumentKind, LanguageKind};

    fn make_document(name: &str, text: &[u8]) -> Arc<Document> {
        Arc::new(Document::new(
            DocumentId::new(),
            name,
            DocumentKind::Source,
            Content::new(text.to_vec()),
        ))
    }

    fn make_workspace() -> WorkspaceSnapshot {
        let app = Project::new(ProjectId::new(), "App", LanguageKind::CSharp).with_documents(
            vec![
                make_document("Main.cs", b"class Main { }"),
                make_document("Util.cs", b"class Util { }"),
            ],
        );
        WorkspaceSnapshot::new(vec![Arc::new(app)]).unwrap()
    }

    #[test]
    fn identical_snapshots_diff_empty() {
        let workspace = make_workspace();
        let diff = diff_snapshots(Some(&workspace), &workspace);
        assert!(diff.is_empty());
    }

    #[test]
    fn empty_to_populated_is_all_additions() {
        let workspace = make_workspace();
        let diff = diff_snapshots(None, &workspace);
        assert_eq!(diff.len(), 1);
        assert!(matches!(diff.changes[0], ProjectChange::Added { .. }));
    }

    #[test]
    fn removed_project_is_reported() {
        let workspace = make_workspace();
        let emptied = workspace
            .remove_project(workspace.projects()[0].id())
            .unwrap();
        let diff = diff_snapshots(Some(&workspace), &emptied);
        assert_eq!(diff.len(), 1);
        assert!(matches!(diff.changes[0], ProjectChange::Removed { .. }));
    }

    #[test]
    fn document_edit_is_a_nested_modification() {
        let workspace = make_workspace();
        let edited_id = workspace.projects()[0].documents()[0].id();
        let updated = workspace
            .with_document_text(edited_id, &b"class Main { int x; }"[..])
            .unwrap();

        let diff = diff_snapshots(Some(&workspace), &updated);
        assert_eq!(diff.len(), 1);
        match &diff.changes[0] {
            ProjectChange::Modified { documents, .. } => {
                assert_eq!(documents.len(), 1);
                assert!(matches!(
                    documents[0],
                    DocumentChange::Modified { id, .. } if id == edited_id
                ));
            }
            other => panic!("expected Modified, got {other:?}"),
        }
    }

    #[test]
    fn added_document_is_reported() {
        let workspace = make_workspace();
        let project_id = workspace.projects()[0].id();
        let doc = make_document("New.cs", b"class New { }");
        let doc_id = doc.id();
        let grown = workspace.with_document_added(project_id, doc).unwrap();

        let diff = diff_snapshots(Some(&workspace), &grown);
        match &diff.changes[0] {
            ProjectChange::Modified { documents, .. } => {
                assert!(matches!(
                    documents[0],
                    DocumentChange::Added { id, .. } if id == doc_id
                ));
            }
            other => panic!("expected Modified, got {other:?}"),
        }
    }
}
