//! Declared dependency edges between artifacts.

use serde::{Deserialize, Serialize};

/// How one artifact relates to the artifact it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    ComposedOf,
    DependsOn,
    DerivedFrom,
    Unspecified,
}

impl RelationKind {
    /// Whether edges of this kind participate in dependency resolution.
    pub fn is_dependency(self) -> bool {
        matches!(self, Self::ComposedOf | Self::DependsOn)
    }
}

/// A declared dependency edge: a canonical reference to another artifact,
/// extracted (never mutated) from the source artifact's metadata.
///
/// `target` may embed a version using the `url|version` convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedReference {
    pub target: String,
    pub relation: RelationKind,
    /// An owned dependency is part of the same deployable unit as its
    /// referrer. Ownership propagates along any discovery path.
    #[serde(default)]
    pub owned: bool,
}

impl RelatedReference {
    pub fn new(target: impl Into<String>, relation: RelationKind) -> Self {
        Self {
            target: target.into(),
            relation,
            owned: false,
        }
    }

    pub fn owned(target: impl Into<String>, relation: RelationKind) -> Self {
        Self {
            target: target.into(),
            relation,
            owned: true,
        }
    }
}
