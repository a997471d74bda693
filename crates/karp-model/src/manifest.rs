//! Manifest records: a shallow summary of one artifact's direct,
//! version-pinned dependencies.

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactStatus;

/// The kind of a manifest parameter, following CRMI naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    /// A terminology system pin, value `system|version`.
    #[serde(rename = "system-version")]
    SystemVersion,
    /// A canonical resource pin, value `url|version`.
    #[serde(rename = "canonicalVersion")]
    CanonicalVersion,
}

/// One pinned dependency of the module the manifest describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestParameter {
    pub kind: ParameterKind,
    pub value: String,
    /// Resource type hint for canonical pins whose type could be inferred
    /// from the reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

/// A manifest artifact: identity copied from the module it summarizes,
/// plus one parameter per directly declared dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub version: Option<String>,
    pub status: ArtifactStatus,
    pub parameters: Vec<ManifestParameter>,
}
