//! Cycle-safe depth-first traversal of the artifact dependency graph.
//!
//! The walker resolves each root through the store, expands every visited
//! artifact through the extractor, and accumulates a deduplicated,
//! post-ordered output list: each artifact appears after all of its
//! successfully resolved dependencies. Cycle edges are cut and reported,
//! never followed. All per-run state lives in an explicit [`WalkState`]
//! threaded through the recursion.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use karp_model::artifact::{Artifact, ArtifactId};
use karp_model::canonical::Canonical;
use karp_model::error::{KarpError, KarpResult};

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticReport};
use crate::extract::extract;
use crate::graph::{DependencyGraph, GraphEdge};
use crate::store::{ArtifactStore, StoreError};
use crate::version::{select, SelectError};

/// Cooperative cancellation flag shared between a caller and a walk.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Traversal state of one node within a run. Absence means unvisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    InProgress,
    Done,
}

/// One entry of the walk output.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArtifact {
    pub artifact: Artifact,
    /// True when any discovery path reached this artifact through an
    /// owned reference.
    pub owned: bool,
}

/// The outcome of one walk: ordered artifacts, accumulated diagnostics,
/// and the resolved graph view.
#[derive(Debug)]
pub struct WalkResult {
    /// Post-ordered, duplicate-free: dependencies precede dependents.
    pub artifacts: Vec<ResolvedArtifact>,
    pub diagnostics: DiagnosticReport,
    pub graph: DependencyGraph,
}

impl WalkResult {
    /// The ordered artifacts without ownership flags, for assembly.
    pub fn artifacts_in_order(&self) -> Vec<Artifact> {
        self.artifacts.iter().map(|r| r.artifact.clone()).collect()
    }
}

#[derive(Default)]
struct WalkState {
    visit: HashMap<ArtifactId, VisitState>,
    output: Vec<ResolvedArtifact>,
    /// Index into `output` per done artifact, for ownership OR-ing.
    position: HashMap<ArtifactId, usize>,
    /// In-progress nodes reached through an owned cycle edge; consumed
    /// when the node is appended to the output.
    pending_owned: HashSet<ArtifactId>,
    diagnostics: DiagnosticReport,
    graph: DependencyGraph,
}

/// Depth-first dependency walker over an artifact store.
pub struct Walker<'a, S> {
    store: &'a S,
    cancel: CancelToken,
}

impl<'a, S: ArtifactStore> Walker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            cancel: CancelToken::new(),
        }
    }

    /// Attach a caller-supplied cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Walk the transitive dependency closure of one or more roots.
    ///
    /// A root that is malformed, unresolvable, or version-ambiguous is a
    /// precondition violation and fails the whole call. Everything found
    /// past the roots degrades to diagnostics.
    pub fn walk(&self, roots: &[&str]) -> KarpResult<WalkResult> {
        let mut state = WalkState::default();

        for root in roots {
            let artifact = self.resolve_root(root)?;
            let idx = state.graph.add_node(&artifact);
            state.graph.add_root(idx);
            // A root may already be captured through an earlier root's subtree.
            if !state.visit.contains_key(&artifact.id) {
                self.visit(artifact, false, &mut state)?;
            }
        }

        Ok(WalkResult {
            artifacts: state.output,
            diagnostics: state.diagnostics,
            graph: state.graph,
        })
    }

    fn resolve_root(&self, reference: &str) -> KarpResult<Artifact> {
        let canonical = Canonical::parse(reference).ok_or_else(|| KarpError::MalformedRoot {
            reference: reference.to_string(),
        })?;
        let candidates = match self.store.read(&canonical.url, None) {
            Ok(candidates) => candidates,
            Err(StoreError::NotFound(_)) => Vec::new(),
            Err(StoreError::Io(message)) => return Err(KarpError::Store { message }),
        };
        match select(&candidates, canonical.version.as_deref()) {
            Ok(Some(artifact)) => Ok(artifact.clone()),
            Ok(None) => Err(KarpError::RootNotFound {
                reference: reference.to_string(),
            }),
            Err(SelectError::Ambiguous { .. }) => Err(KarpError::AmbiguousRoot {
                reference: reference.to_string(),
            }),
        }
    }

    fn visit(&self, artifact: Artifact, owned: bool, state: &mut WalkState) -> KarpResult<()> {
        if self.cancel.is_cancelled() {
            return Err(KarpError::Cancelled);
        }

        let id = artifact.id.clone();
        tracing::debug!("visiting {id}");
        state.visit.insert(id.clone(), VisitState::InProgress);
        let node = state.graph.add_node(&artifact);

        for reference in extract(&artifact) {
            let Some(canonical) = Canonical::parse(&reference.target) else {
                self.diagnose(
                    state,
                    DiagnosticKind::MalformedReference,
                    &reference.target,
                    &id,
                    "reference does not parse as url or url|version",
                );
                continue;
            };

            let candidates = match self.store.read(&canonical.url, None) {
                Ok(candidates) => candidates,
                Err(StoreError::NotFound(_)) => Vec::new(),
                Err(StoreError::Io(message)) => {
                    self.diagnose(
                        state,
                        DiagnosticKind::StoreFailure,
                        &reference.target,
                        &id,
                        &message,
                    );
                    continue;
                }
            };

            let target = match select(&candidates, canonical.version.as_deref()) {
                Ok(Some(target)) => target.clone(),
                Ok(None) => {
                    if candidates.is_empty() {
                        self.diagnose(
                            state,
                            DiagnosticKind::Unresolved,
                            &reference.target,
                            &id,
                            "no candidates in store",
                        );
                    } else {
                        self.diagnose(
                            state,
                            DiagnosticKind::VersionNotFound,
                            &reference.target,
                            &id,
                            "no candidate carries the requested version",
                        );
                    }
                    continue;
                }
                Err(error @ SelectError::Ambiguous { .. }) => {
                    self.diagnose(
                        state,
                        DiagnosticKind::AmbiguousVersion,
                        &reference.target,
                        &id,
                        &error.to_string(),
                    );
                    continue;
                }
            };

            let target_node = state.graph.add_node(&target);
            state.graph.add_edge(
                node,
                target_node,
                GraphEdge {
                    relation: reference.relation,
                    owned: reference.owned,
                },
            );

            match state.visit.get(&target.id).copied() {
                Some(VisitState::InProgress) => {
                    // The cycle edge is cut, but ownership still propagates
                    // along it.
                    if reference.owned {
                        state.pending_owned.insert(target.id.clone());
                    }
                    self.diagnose(
                        state,
                        DiagnosticKind::CycleDetected,
                        &reference.target,
                        &id,
                        &format!("{} is an ancestor on the current path", target.id),
                    );
                }
                Some(VisitState::Done) => {
                    // Already captured; an owned path still marks it owned.
                    if reference.owned {
                        if let Some(&position) = state.position.get(&target.id) {
                            state.output[position].owned = true;
                        }
                    }
                }
                None => self.visit(target, reference.owned, state)?,
            }
        }

        let owned = owned || state.pending_owned.remove(&id);
        state.position.insert(id.clone(), state.output.len());
        state.output.push(ResolvedArtifact { artifact, owned });
        state.visit.insert(id, VisitState::Done);
        Ok(())
    }

    fn diagnose(
        &self,
        state: &mut WalkState,
        kind: DiagnosticKind,
        reference: &str,
        source: &ArtifactId,
        detail: &str,
    ) {
        tracing::warn!("{kind} on {reference} via {source}: {detail}");
        state.diagnostics.add(Diagnostic {
            kind,
            reference: reference.to_string(),
            source: Some(source.to_string()),
            detail: detail.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use karp_model::artifact::ArtifactKind;
    use karp_model::reference::{RelatedReference, RelationKind};

    fn library(url: &str, version: &str) -> Artifact {
        Artifact::new(url, Some(version), ArtifactKind::Library)
    }

    #[test]
    fn single_artifact_walk() {
        let mut store = MemoryStore::new();
        store.insert(library("http://example.org/fhir/Library/A", "1.0.0"));

        let result = Walker::new(&store)
            .walk(&["http://example.org/fhir/Library/A|1.0.0"])
            .unwrap();
        assert_eq!(result.artifacts.len(), 1);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn malformed_root_is_fatal() {
        let store = MemoryStore::new();
        let err = Walker::new(&store).walk(&["not-a-canonical|"]).unwrap_err();
        assert!(matches!(err, KarpError::MalformedRoot { .. }));
    }

    #[test]
    fn missing_root_is_fatal() {
        let store = MemoryStore::new();
        let err = Walker::new(&store)
            .walk(&["http://example.org/fhir/Library/Nope"])
            .unwrap_err();
        assert!(matches!(err, KarpError::RootNotFound { .. }));
    }

    #[test]
    fn ambiguous_root_is_fatal() {
        let mut store = MemoryStore::new();
        store.insert(library("http://example.org/fhir/Library/A", "1.0.0"));
        store.insert(library("http://example.org/fhir/Library/A", "1.0.0"));

        let err = Walker::new(&store)
            .walk(&["http://example.org/fhir/Library/A|1.0.0"])
            .unwrap_err();
        assert!(matches!(err, KarpError::AmbiguousRoot { .. }));
    }

    #[test]
    fn root_unpinned_takes_latest() {
        let mut store = MemoryStore::new();
        store.insert(library("http://example.org/fhir/Library/A", "1.2.0"));
        store.insert(library("http://example.org/fhir/Library/A", "1.10.0"));

        let result = Walker::new(&store)
            .walk(&["http://example.org/fhir/Library/A"])
            .unwrap();
        assert_eq!(
            result.artifacts[0].artifact.id.version.as_deref(),
            Some("1.10.0")
        );
    }

    #[test]
    fn cancelled_walk_aborts() {
        let mut store = MemoryStore::new();
        store.insert(library("http://example.org/fhir/Library/A", "1.0.0"));

        let cancel = CancelToken::new();
        cancel.cancel();
        let err = Walker::new(&store)
            .with_cancel(cancel)
            .walk(&["http://example.org/fhir/Library/A|1.0.0"])
            .unwrap_err();
        assert!(matches!(err, KarpError::Cancelled));
    }

    #[test]
    fn owned_reference_marks_output_entry() {
        let mut store = MemoryStore::new();
        store.insert(
            library("http://example.org/fhir/Library/Root", "1.0.0").with_related(
                RelatedReference::owned(
                    "http://example.org/fhir/Library/Part|1.0.0",
                    RelationKind::ComposedOf,
                ),
            ),
        );
        store.insert(library("http://example.org/fhir/Library/Part", "1.0.0"));

        let result = Walker::new(&store)
            .walk(&["http://example.org/fhir/Library/Root|1.0.0"])
            .unwrap();
        let part = result
            .artifacts
            .iter()
            .find(|r| r.artifact.id.url.ends_with("Part"))
            .unwrap();
        assert!(part.owned);
        let root = result
            .artifacts
            .iter()
            .find(|r| r.artifact.id.url.ends_with("Root"))
            .unwrap();
        assert!(!root.owned);
    }
}
