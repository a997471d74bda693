//! Bundle assembly.
//!
//! The assembler renders an already-ordered, already-deduplicated artifact
//! list into one create/upsert operation per artifact. Ordering and
//! deduplication are the walker's guarantees; the assembler trusts its
//! input and never reorders or drops entries, so the bundle can be applied
//! top-down without forward references.

use karp_model::artifact::Artifact;
use serde::{Deserialize, Serialize};

/// The operation verb applied per bundle entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Create,
    Upsert,
}

/// One deployable operation: an artifact and its verb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub artifact: Artifact,
    pub verb: Verb,
}

/// An ordered set of operations needed to deploy an artifact closure.
///
/// No transactional semantics are implied; execution belongs to a
/// downstream collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub entries: Vec<PackageEntry>,
}

impl Bundle {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assemble a bundle from dependency-ordered artifacts.
///
/// Empty input yields an empty bundle.
pub fn assemble(artifacts: &[Artifact], verb: Verb) -> Bundle {
    let entries = artifacts
        .iter()
        .map(|artifact| PackageEntry {
            artifact: artifact.clone(),
            verb,
        })
        .collect();
    tracing::debug!("assembled bundle of {} entries", artifacts.len());
    Bundle { entries }
}
