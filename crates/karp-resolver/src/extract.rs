//! Dependency edge extraction.
//!
//! Given one artifact, produce its outgoing dependency edges in declared
//! order: related-artifact entries whose relation makes them dependencies,
//! then direct library inclusions, then definitional canonicals from
//! action/rule structures of plan/measure-like artifacts. Entries lacking
//! a reference are skipped, not errored.

use karp_model::artifact::Artifact;
use karp_model::reference::{RelatedReference, RelationKind};

/// Extract all outgoing dependency edges of `artifact`.
///
/// Pure and deterministic: identical input yields identical output.
pub fn extract(artifact: &Artifact) -> Vec<RelatedReference> {
    let mut edges = Vec::new();

    for reference in &artifact.related {
        if reference.relation.is_dependency() && !reference.target.trim().is_empty() {
            edges.push(reference.clone());
        }
    }

    for library in &artifact.libraries {
        if !library.trim().is_empty() {
            edges.push(RelatedReference::new(library.clone(), RelationKind::DependsOn));
        }
    }

    if artifact.kind.has_actions() {
        for definition in &artifact.definitions {
            if !definition.trim().is_empty() {
                edges.push(RelatedReference::new(
                    definition.clone(),
                    RelationKind::DependsOn,
                ));
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use karp_model::artifact::ArtifactKind;

    #[test]
    fn related_filtered_by_relation() {
        let artifact = Artifact::new(
            "http://example.org/fhir/Library/A",
            Some("1.0.0"),
            ArtifactKind::Library,
        )
        .with_related(RelatedReference::new(
            "http://example.org/fhir/ValueSet/vs",
            RelationKind::DependsOn,
        ))
        .with_related(RelatedReference::new(
            "http://example.org/fhir/Library/citation",
            RelationKind::DerivedFrom,
        ))
        .with_related(RelatedReference::owned(
            "http://example.org/fhir/Library/part",
            RelationKind::ComposedOf,
        ));

        let edges = extract(&artifact);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].target, "http://example.org/fhir/ValueSet/vs");
        assert_eq!(edges[1].target, "http://example.org/fhir/Library/part");
        assert!(edges[1].owned);
    }

    #[test]
    fn blank_references_skipped() {
        let artifact = Artifact::new(
            "http://example.org/fhir/Library/A",
            None,
            ArtifactKind::Library,
        )
        .with_related(RelatedReference::new("", RelationKind::DependsOn))
        .with_related(RelatedReference::new("   ", RelationKind::ComposedOf))
        .with_library("");

        assert!(extract(&artifact).is_empty());
    }

    #[test]
    fn libraries_become_depends_on_edges() {
        let artifact = Artifact::new(
            "http://example.org/fhir/Measure/M",
            Some("1.0.0"),
            ArtifactKind::Measure,
        )
        .with_library("http://example.org/fhir/Library/Logic|2.0.0");

        let edges = extract(&artifact);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relation, RelationKind::DependsOn);
        assert!(!edges[0].owned);
    }

    #[test]
    fn definitions_only_for_action_bearing_kinds() {
        let plan = Artifact::new(
            "http://example.org/fhir/PlanDefinition/P",
            None,
            ArtifactKind::PlanDefinition,
        )
        .with_definition("http://example.org/fhir/ActivityDefinition/give-med");
        assert_eq!(extract(&plan).len(), 1);

        // A stray definition on a library-kind artifact is not an edge.
        let library = Artifact::new(
            "http://example.org/fhir/Library/L",
            None,
            ArtifactKind::Library,
        )
        .with_definition("http://example.org/fhir/ActivityDefinition/give-med");
        assert!(extract(&library).is_empty());
    }

    #[test]
    fn declared_order_preserved() {
        let artifact = Artifact::new(
            "http://example.org/fhir/PlanDefinition/P",
            None,
            ArtifactKind::PlanDefinition,
        )
        .with_related(RelatedReference::new(
            "http://example.org/fhir/ValueSet/first",
            RelationKind::DependsOn,
        ))
        .with_library("http://example.org/fhir/Library/second")
        .with_definition("http://example.org/fhir/ActivityDefinition/third");

        let edges = extract(&artifact);
        let targets: Vec<&str> = edges.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(
            targets,
            vec![
                "http://example.org/fhir/ValueSet/first",
                "http://example.org/fhir/Library/second",
                "http://example.org/fhir/ActivityDefinition/third",
            ]
        );
    }
}
