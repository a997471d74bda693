//! Manifest inference.
//!
//! A manifest summarizes one module artifact's *direct* declared
//! dependencies as version pins, classified by what is being depended on:
//! terminology systems become `system-version` parameters, canonical
//! resources become `canonicalVersion`, with a resource type hint when the
//! reference's type can be inferred. References with no inferable type
//! default to terminology systems. This is shallow by design, one level
//! deep, in contrast to the walker's transitive closure.

use karp_model::artifact::Artifact;
use karp_model::canonical::Canonical;
use karp_model::error::{KarpError, KarpResult};
use karp_model::manifest::{Manifest, ManifestParameter, ParameterKind};

/// Build a manifest from a module artifact's declared references.
///
/// Fails when the module has no name, since the manifest name is derived
/// from it. Malformed references are skipped; everything else is carried
/// over in declaration order.
pub fn build_manifest(module: &Artifact) -> KarpResult<Manifest> {
    let name = module
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| KarpError::MissingName {
            url: module.id.url.clone(),
        })?;

    let mut parameters = Vec::new();
    for reference in &module.related {
        if reference.target.trim().is_empty() {
            continue;
        }
        let Some(canonical) = Canonical::parse(&reference.target) else {
            tracing::warn!("skipping malformed reference {} on {}", reference.target, module.id);
            continue;
        };
        parameters.push(classify(&canonical));
    }

    Ok(Manifest {
        name: format!("{name}Manifest"),
        url: module.id.url.clone(),
        version: module.id.version.clone(),
        status: module.status,
        parameters,
    })
}

fn classify(canonical: &Canonical) -> ManifestParameter {
    match canonical.resource_type() {
        Some("CodeSystem") => ManifestParameter {
            kind: ParameterKind::SystemVersion,
            value: canonical.to_string(),
            resource_type: None,
        },
        Some("ValueSet") => ManifestParameter {
            kind: ParameterKind::CanonicalVersion,
            value: canonical.to_string(),
            resource_type: None,
        },
        Some(resource_type) => ManifestParameter {
            kind: ParameterKind::CanonicalVersion,
            value: canonical.to_string(),
            resource_type: Some(resource_type.to_string()),
        },
        None => {
            // References without an inferable type are most often external
            // code systems with non-standard URLs (e.g. http://loinc.org).
            tracing::info!("no resource type for {canonical}, defaulting to CodeSystem");
            ManifestParameter {
                kind: ParameterKind::SystemVersion,
                value: canonical.to_string(),
                resource_type: None,
            }
        }
    }
}
