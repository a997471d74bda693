//! Artifact version comparison and selection.
//!
//! Artifact versions use a dotted-numeric ordering: segments are split on
//! `.` and `-`, numeric segments compare as numbers, missing trailing
//! segments count as zero, and non-numeric segments fall back to a
//! case-insensitive lexical comparison. Comparison never fails, whatever
//! the input looks like.

use std::cmp::Ordering;
use std::fmt;

use karp_model::artifact::Artifact;
use thiserror::Error;

/// A parsed artifact version with comparable segments.
#[derive(Debug, Clone)]
pub struct ArtifactVersion {
    pub original: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Numeric(u64),
    Text(String),
}

impl ArtifactVersion {
    pub fn parse(version: &str) -> Self {
        let segments = version
            .split(['.', '-'])
            .filter(|token| !token.is_empty())
            .map(|token| match token.parse::<u64>() {
                Ok(n) => Segment::Numeric(n),
                Err(_) => Segment::Text(token.to_string()),
            })
            .collect();
        Self {
            original: version.to_string(),
            segments,
        }
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for ArtifactVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ArtifactVersion {}

impl Ord for ArtifactVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.segments.len().max(other.segments.len());
        for i in 0..max_len {
            let ord = compare_segments(self.segments.get(i), other.segments.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for ArtifactVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_segments(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        // Missing numeric fields count as zero; a bare text tail sorts
        // below its absence (a pre-release style convention).
        (Some(s), None) => compare_segment_to_empty(s),
        (None, Some(s)) => compare_segment_to_empty(s).reverse(),
        (Some(a), Some(b)) => compare_two_segments(a, b),
    }
}

fn compare_segment_to_empty(segment: &Segment) -> Ordering {
    match segment {
        Segment::Numeric(0) => Ordering::Equal,
        Segment::Numeric(_) => Ordering::Greater,
        Segment::Text(_) => Ordering::Less,
    }
}

fn compare_two_segments(a: &Segment, b: &Segment) -> Ordering {
    match (a, b) {
        (Segment::Numeric(a), Segment::Numeric(b)) => a.cmp(b),
        (Segment::Numeric(_), Segment::Text(_)) => Ordering::Greater,
        (Segment::Text(_), Segment::Numeric(_)) => Ordering::Less,
        (Segment::Text(a), Segment::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// Failure modes of version selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    /// Multiple candidates share the explicitly requested version. This is
    /// a data-integrity problem in the store, distinct from the version
    /// simply being absent.
    #[error("{count} candidates share version {version}")]
    Ambiguous { version: String, count: usize },
}

/// Pick one artifact from a candidate set sharing a canonical URL.
///
/// With an explicit `wanted` version, returns the unique candidate carrying
/// it, `None` when absent, or [`SelectError::Ambiguous`] when several
/// candidates carry it. Without one, returns the candidate with the highest
/// version; unversioned candidates rank lowest, and the first of equal
/// maxima wins (stable in input order).
pub fn select<'a>(
    candidates: &'a [Artifact],
    wanted: Option<&str>,
) -> Result<Option<&'a Artifact>, SelectError> {
    if let Some(wanted) = wanted {
        let mut matches = candidates
            .iter()
            .filter(|c| c.id.version.as_deref() == Some(wanted));
        return match (matches.next(), matches.count()) {
            (None, _) => Ok(None),
            (Some(only), 0) => Ok(Some(only)),
            (Some(_), extra) => Err(SelectError::Ambiguous {
                version: wanted.to_string(),
                count: extra + 1,
            }),
        };
    }

    let mut best: Option<(&Artifact, Option<ArtifactVersion>)> = None;
    for candidate in candidates {
        let version = candidate.id.version.as_deref().map(ArtifactVersion::parse);
        match &best {
            None => best = Some((candidate, version)),
            Some((_, best_version)) => {
                let newer = match (&version, best_version) {
                    (Some(v), Some(b)) => v.cmp(b) == Ordering::Greater,
                    (Some(_), None) => true,
                    _ => false,
                };
                if newer {
                    best = Some((candidate, version));
                }
            }
        }
    }
    Ok(best.map(|(artifact, _)| artifact))
}
