//! Diagnostic accumulation and reporting for resolution runs.
//!
//! Unresolved references, version conflicts, cycles, and store failures
//! are expected conditions: the walk continues and callers decide whether
//! the accumulated diagnostics should abort a deployment.

use std::fmt;

use serde::Serialize;

/// A report of all non-fatal conditions encountered during one run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    pub diagnostics: Vec<Diagnostic>,
}

/// What went wrong on a single dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// The target could not be found in the artifact store.
    Unresolved,
    /// An explicit version was requested but no candidate carries it.
    VersionNotFound,
    /// Multiple store candidates share the requested version.
    AmbiguousVersion,
    /// The edge closes a cycle back to an ancestor on the current path.
    CycleDetected,
    /// The target reference does not parse as `url` or `url|version`.
    MalformedReference,
    /// The artifact store reported an I/O failure for this edge.
    StoreFailure,
}

/// A single non-fatal condition, attached to the edge that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The canonical reference the condition was observed on.
    pub reference: String,
    /// Identity of the artifact whose edge produced the condition, when known.
    pub source: Option<String>,
    pub detail: String,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Number of diagnostics of one kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unresolved => "unresolved",
            Self::VersionNotFound => "version-not-found",
            Self::AmbiguousVersion => "ambiguous-version",
            Self::CycleDetected => "cycle-detected",
            Self::MalformedReference => "malformed-reference",
            Self::StoreFailure => "store-failure",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(
                f,
                "[{}] {} (via {}): {}",
                self.kind, self.reference, source, self.detail
            ),
            None => write!(f, "[{}] {}: {}", self.kind, self.reference, self.detail),
        }
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return write!(f, "No diagnostics.");
        }
        writeln!(f, "Diagnostics ({}):", self.diagnostics.len())?;
        for diagnostic in &self.diagnostics {
            writeln!(f, "  {diagnostic}")?;
        }
        Ok(())
    }
}
