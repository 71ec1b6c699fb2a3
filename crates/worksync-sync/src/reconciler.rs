use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use worksync_snapshot::{Content, Document, Project, WorkspaceSnapshot};
use worksync_types::{Checksum, LanguageKind, ProjectId};

use crate::error::{SyncError, SyncResult};
use crate::provider::AssetProvider;

/// The language kinds this replica can materialize.
///
/// A project whose language has no entry here fails synchronization with
/// [`SyncError::UnknownLanguage`] before anything is published.
#[derive(Clone, Debug)]
pub struct LanguageRegistry {
    supported: HashSet<LanguageKind>,
}

impl LanguageRegistry {
    pub fn new(supported: impl IntoIterator<Item = LanguageKind>) -> Self {
        Self {
            supported: supported.into_iter().collect(),
        }
    }

    pub fn supports(&self, language: &LanguageKind) -> bool {
        self.supported.contains(language)
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new([LanguageKind::CSharp, LanguageKind::VisualBasic])
    }
}

/// Counters for one reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Assets fetched from the source (local store hits excluded).
    pub assets_fetched: usize,
    /// Projects reused whole from the previous snapshot.
    pub projects_reused: usize,
    /// Documents reused whole from the previous snapshot.
    pub documents_reused: usize,
}

/// The result of a reconciliation: the reconstructed snapshot plus counters.
#[derive(Clone, Debug)]
pub struct ReconcileOutcome {
    pub snapshot: WorkspaceSnapshot,
    pub stats: SyncStats,
}

/// Everything reusable from the replica's current snapshot, indexed by
/// checksum. The write-once asset invariant makes equal checksums mean equal
/// payloads, so checksum equality alone decides reuse; a reused node keeps
/// its identity because it *is* the previous node.
struct ReuseIndex {
    projects: HashMap<Checksum, Arc<Project>>,
    documents: HashMap<Checksum, Arc<Document>>,
    contents: HashMap<Checksum, Content>,
}

impl ReuseIndex {
    fn build(current: Option<&WorkspaceSnapshot>) -> Self {
        let mut projects = HashMap::new();
        let mut documents = HashMap::new();
        let mut contents = HashMap::new();
        if let Some(snapshot) = current {
            for project in snapshot.projects() {
                for document in project.all_documents() {
                    contents.insert(document.content().checksum(), document.content().clone());
                    documents.insert(document.checksum(), Arc::clone(document));
                }
                for reference in project
                    .metadata_references()
                    .iter()
                    .chain(project.analyzer_references())
                {
                    contents.insert(reference.checksum(), reference.clone());
                }
                projects.insert(project.checksum(), Arc::clone(project));
            }
        }
        Self {
            projects,
            documents,
            contents,
        }
    }
}

/// Diff/sync negotiator and snapshot applier.
///
/// Given a target root checksum, determines the minimal set of assets to
/// fetch and reconstructs a snapshot matching the target, reusing every
/// locally held node with an equal checksum. Reconstructed nodes carry the
/// checksum they were fetched under: correct by construction, never
/// re-hashed to verify.
pub struct WorkspaceReconciler {
    provider: AssetProvider,
    registry: LanguageRegistry,
}

impl WorkspaceReconciler {
    pub fn new(provider: AssetProvider, registry: LanguageRegistry) -> Self {
        Self { provider, registry }
    }

    /// The provider backing this reconciler.
    pub fn provider(&self) -> &AssetProvider {
        &self.provider
    }

    /// Reconcile the local snapshot against the target root checksum.
    ///
    /// The fast path (target equals the current root) returns the current
    /// snapshot unchanged at zero network and hashing cost. Otherwise the
    /// target's descriptors are walked top-down, fetching only subtrees with
    /// no checksum-equal local counterpart.
    pub async fn reconcile(
        &self,
        target: Checksum,
        current: Option<&WorkspaceSnapshot>,
        cancel: &CancellationToken,
    ) -> SyncResult<ReconcileOutcome> {
        if let Some(existing) = current {
            if existing.checksum() == target {
                debug!(root = %target.short_hex(), "target already current");
                return Ok(ReconcileOutcome {
                    snapshot: existing.clone(),
                    stats: SyncStats::default(),
                });
            }
        }

        let fetched_before = self.provider.fetched();
        let descriptor = self.provider.resolve_workspace(target, cancel).await?;
        let index = ReuseIndex::build(current);

        let mut stats = SyncStats::default();
        let mut projects = Vec::with_capacity(descriptor.projects.len());
        for &project_checksum in &descriptor.projects {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            if let Some(existing) = index.projects.get(&project_checksum) {
                stats.projects_reused += 1;
                projects.push(Arc::clone(existing));
                continue;
            }
            projects.push(
                self.rebuild_project(project_checksum, &index, &mut stats, cancel)
                    .await?,
            );
        }

        validate_project_references(&projects)?;

        let snapshot = WorkspaceSnapshot::from_descriptor(projects, target);
        stats.assets_fetched = self.provider.fetched() - fetched_before;
        debug!(
            root = %target.short_hex(),
            fetched = stats.assets_fetched,
            projects_reused = stats.projects_reused,
            documents_reused = stats.documents_reused,
            "workspace reconciled"
        );
        Ok(ReconcileOutcome { snapshot, stats })
    }

    async fn rebuild_project(
        &self,
        checksum: Checksum,
        index: &ReuseIndex,
        stats: &mut SyncStats,
        cancel: &CancellationToken,
    ) -> SyncResult<Arc<Project>> {
        let descriptor = self.provider.resolve_project(checksum, cancel).await?;
        if !self.registry.supports(&descriptor.language) {
            return Err(SyncError::UnknownLanguage(
                descriptor.language.name().to_string(),
            ));
        }

        let documents = self
            .rebuild_documents(&descriptor.documents, index, stats, cancel)
            .await?;
        let additional_documents = self
            .rebuild_documents(&descriptor.additional_documents, index, stats, cancel)
            .await?;
        let metadata_references = self
            .resolve_contents(&descriptor.metadata_references, index, cancel)
            .await?;
        let analyzer_references = self
            .resolve_contents(&descriptor.analyzer_references, index, cancel)
            .await?;

        Ok(Arc::new(Project::from_descriptor(
            descriptor,
            documents,
            additional_documents,
            metadata_references,
            analyzer_references,
            checksum,
        )))
    }

    async fn rebuild_documents(
        &self,
        checksums: &[Checksum],
        index: &ReuseIndex,
        stats: &mut SyncStats,
        cancel: &CancellationToken,
    ) -> SyncResult<Vec<Arc<Document>>> {
        let mut documents = Vec::with_capacity(checksums.len());
        for &checksum in checksums {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            if let Some(existing) = index.documents.get(&checksum) {
                stats.documents_reused += 1;
                documents.push(Arc::clone(existing));
                continue;
            }
            let descriptor = self.provider.resolve_document(checksum, cancel).await?;
            let content = self
                .resolve_one_content(descriptor.content, index, cancel)
                .await?;
            documents.push(Arc::new(Document::from_descriptor(
                descriptor, content, checksum,
            )));
        }
        Ok(documents)
    }

    async fn resolve_contents(
        &self,
        checksums: &[Checksum],
        index: &ReuseIndex,
        cancel: &CancellationToken,
    ) -> SyncResult<Vec<Content>> {
        let mut contents = Vec::with_capacity(checksums.len());
        for &checksum in checksums {
            contents.push(self.resolve_one_content(checksum, index, cancel).await?);
        }
        Ok(contents)
    }

    async fn resolve_one_content(
        &self,
        checksum: Checksum,
        index: &ReuseIndex,
        cancel: &CancellationToken,
    ) -> SyncResult<Content> {
        if let Some(existing) = index.contents.get(&checksum) {
            return Ok(existing.clone());
        }
        let bytes = self.provider.resolve_content(checksum, cancel).await?;
        Ok(Content::from_parts(bytes, checksum))
    }
}

/// Group-to-group edges are identity references and may point at a project
/// defined later in descriptor order, so they are validated only after all
/// projects exist.
fn validate_project_references(projects: &[Arc<Project>]) -> SyncResult<()> {
    let known: HashSet<ProjectId> = projects.iter().map(|p| p.id()).collect();
    for project in projects {
        for target in project.project_references() {
            if !known.contains(target) {
                return Err(SyncError::DanglingProjectReference {
                    from: project.id(),
                    to: *target,
                });
            }
        }
    }
    Ok(())
}
