//! Canonical reference parsing.
//!
//! A canonical reference is a URL identifying an artifact, optionally
//! suffixed with `|version`, e.g.
//! `http://example.org/fhir/Library/Common|1.2.0`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed canonical reference: URL plus optional pinned version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Canonical {
    pub url: String,
    pub version: Option<String>,
}

impl Canonical {
    /// Parse a `url` or `url|version` string.
    ///
    /// Returns `None` for malformed input: an empty URL, an empty version
    /// after the `|`, or more than one `|` separator.
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        let mut parts = reference.split('|');
        let url = parts.next().unwrap_or_default();
        let version = parts.next();
        if parts.next().is_some() || url.is_empty() {
            return None;
        }
        match version {
            Some("") => None,
            Some(v) => Some(Self {
                url: url.to_string(),
                version: Some(v.to_string()),
            }),
            None => Some(Self {
                url: url.to_string(),
                version: None,
            }),
        }
    }

    /// Infer the resource type from the URL path.
    ///
    /// Follows the common canonical URL convention where the type is the
    /// second-to-last path segment: `.../ValueSet/my-vs` is a `ValueSet`.
    /// Returns `None` when the URL carries no such segment.
    pub fn resource_type(&self) -> Option<&str> {
        let (rest, _id) = self.url.rsplit_once('/')?;
        let segment = match rest.rsplit_once('/') {
            Some((_, segment)) => segment,
            None => return None,
        };
        if segment.is_empty() || !segment.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            return None;
        }
        Some(segment)
    }

    pub fn has_version(&self) -> bool {
        self.version.is_some()
    }
}

impl fmt::Display for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}|{}", self.url, version),
            None => f.write_str(&self.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_url() {
        let c = Canonical::parse("http://example.org/fhir/Library/Common").unwrap();
        assert_eq!(c.url, "http://example.org/fhir/Library/Common");
        assert_eq!(c.version, None);
    }

    #[test]
    fn parse_versioned_url() {
        let c = Canonical::parse("http://example.org/fhir/Library/Common|1.2.0").unwrap();
        assert_eq!(c.url, "http://example.org/fhir/Library/Common");
        assert_eq!(c.version.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Canonical::parse("").is_none());
        assert!(Canonical::parse("   ").is_none());
        assert!(Canonical::parse("http://example.org/vs|").is_none());
        assert!(Canonical::parse("|1.0.0").is_none());
        assert!(Canonical::parse("http://example.org/vs|1.0|2.0").is_none());
    }

    #[test]
    fn resource_type_from_path() {
        let vs = Canonical::parse("http://example.org/fhir/ValueSet/my-vs").unwrap();
        assert_eq!(vs.resource_type(), Some("ValueSet"));

        let cs = Canonical::parse("http://example.org/fhir/CodeSystem/loinc|2.74").unwrap();
        assert_eq!(cs.resource_type(), Some("CodeSystem"));

        let lib = Canonical::parse("http://example.org/fhir/Library/Common|1.0.0").unwrap();
        assert_eq!(lib.resource_type(), Some("Library"));
    }

    #[test]
    fn resource_type_absent() {
        let flat = Canonical::parse("urn:oid:2.16.840.1.113883.6.1").unwrap();
        assert_eq!(flat.resource_type(), None);

        // Lowercase segment is a path component, not a resource type
        let lower = Canonical::parse("http://example.org/fhir/common").unwrap();
        assert_eq!(lower.resource_type(), None);
    }

    #[test]
    fn display_round_trips() {
        for reference in [
            "http://example.org/fhir/Library/Common",
            "http://example.org/fhir/Library/Common|1.2.0",
        ] {
            assert_eq!(Canonical::parse(reference).unwrap().to_string(), reference);
        }
    }
}
