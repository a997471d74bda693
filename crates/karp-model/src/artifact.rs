//! The in-memory artifact model.
//!
//! An artifact is a versioned, canonically-identified knowledge unit:
//! a decision-support rule, a quality measure, a terminology set, or a
//! reusable logic library. Format-specific adapters populate this model
//! once at ingestion; everything downstream (extraction, traversal,
//! assembly) operates on it without knowing the wire format.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reference::RelatedReference;

/// Artifact identity: canonical URL plus optional version.
///
/// Within one resolution run, `(url, version)` uniquely identifies an
/// artifact instance. Two artifacts with the same URL but different
/// versions are distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId {
    pub url: String,
    pub version: Option<String>,
}

impl ArtifactId {
    pub fn new(url: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            url: url.into(),
            version: version.map(str::to_string),
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}|{}", self.url, version),
            None => f.write_str(&self.url),
        }
    }
}

/// The kind of thing an artifact is, tagged with its resource type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Library,
    Measure,
    PlanDefinition,
    ValueSet,
    CodeSystem,
    Generic,
}

impl ArtifactKind {
    /// Whether this kind carries definitional references in its
    /// action/rule structures.
    pub fn has_actions(self) -> bool {
        matches!(self, Self::PlanDefinition | Self::Measure)
    }
}

/// Publication status of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    Draft,
    Active,
    Retired,
    Unknown,
}

/// Opaque embedded content, e.g. logic source attached to a library.
/// Not interpreted by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A versioned knowledge artifact and its declared dependency edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub status: ArtifactStatus,
    pub kind: ArtifactKind,
    /// Declared related-artifact entries, in declared order.
    #[serde(default)]
    pub related: Vec<RelatedReference>,
    /// Direct library inclusion canonicals.
    #[serde(default)]
    pub libraries: Vec<String>,
    /// Definitional canonicals embedded in action/rule structures
    /// (populated for plan/measure-like artifacts).
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Artifact {
    pub fn new(url: impl Into<String>, version: Option<&str>, kind: ArtifactKind) -> Self {
        Self {
            id: ArtifactId::new(url, version),
            name: None,
            title: None,
            status: ArtifactStatus::Active,
            kind,
            related: Vec::new(),
            libraries: Vec::new(),
            definitions: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: ArtifactStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_related(mut self, reference: RelatedReference) -> Self {
        self.related.push(reference);
        self
    }

    pub fn with_library(mut self, canonical: impl Into<String>) -> Self {
        self.libraries.push(canonical.into());
        self
    }

    pub fn with_definition(mut self, canonical: impl Into<String>) -> Self {
        self.definitions.push(canonical.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// The canonical reference for this artifact, version-pinned when a
    /// version is present.
    pub fn canonical(&self) -> String {
        self.id.to_string()
    }

    pub fn has_version(&self) -> bool {
        self.id.version.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{RelatedReference, RelationKind};

    #[test]
    fn identity_display() {
        let pinned = ArtifactId::new("http://example.org/fhir/Library/A", Some("1.0.0"));
        assert_eq!(pinned.to_string(), "http://example.org/fhir/Library/A|1.0.0");

        let bare = ArtifactId::new("http://example.org/fhir/Library/A", None);
        assert_eq!(bare.to_string(), "http://example.org/fhir/Library/A");
    }

    #[test]
    fn same_url_different_versions_are_distinct() {
        let v1 = ArtifactId::new("http://example.org/fhir/Library/A", Some("1.0.0"));
        let v2 = ArtifactId::new("http://example.org/fhir/Library/A", Some("2.0.0"));
        assert_ne!(v1, v2);
    }

    #[test]
    fn builder_accumulates_edges() {
        let artifact = Artifact::new(
            "http://example.org/fhir/PlanDefinition/P",
            Some("1.0.0"),
            ArtifactKind::PlanDefinition,
        )
        .with_name("P")
        .with_related(RelatedReference::new(
            "http://example.org/fhir/Library/L|1.0.0",
            RelationKind::DependsOn,
        ))
        .with_library("http://example.org/fhir/Library/L|1.0.0")
        .with_definition("http://example.org/fhir/ActivityDefinition/A");

        assert_eq!(artifact.related.len(), 1);
        assert_eq!(artifact.libraries.len(), 1);
        assert_eq!(artifact.definitions.len(), 1);
        assert!(artifact.kind.has_actions());
    }

    #[test]
    fn serde_round_trip() {
        let artifact = Artifact::new(
            "http://example.org/fhir/Library/A",
            Some("1.0.0"),
            ArtifactKind::Library,
        )
        .with_name("A")
        .with_attachment(Attachment {
            content_type: "text/cql".to_string(),
            data: b"define X: 1".to_vec(),
        });

        let json = serde_json::to_string(&artifact).unwrap();
        let back: Artifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, artifact);
    }
}
