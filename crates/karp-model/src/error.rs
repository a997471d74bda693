//! Unified error type for KARP operations.
//!
//! Expected conditions during a walk (unresolved references, cycles,
//! version conflicts) are not errors: they accumulate as diagnostics on
//! the run's result. `KarpError` is reserved for precondition violations
//! on a call's own input and for cancellation.

use miette::Diagnostic;
use thiserror::Error;

/// Fatal failure of a single resolution or manifest call.
#[derive(Debug, Error, Diagnostic)]
pub enum KarpError {
    /// The module artifact has no name, so a manifest name cannot be derived.
    #[error("Module artifact {url} has no name")]
    #[diagnostic(help("Set a computable name on the module artifact before inferring its manifest"))]
    MissingName { url: String },

    /// A root reference does not parse as `url` or `url|version`.
    #[error("Malformed canonical reference: {reference}")]
    #[diagnostic(help("Canonical references are a URL optionally followed by |version"))]
    MalformedRoot { reference: String },

    /// A root reference resolved to no artifact in the store.
    #[error("Root artifact not found: {reference}")]
    RootNotFound { reference: String },

    /// Multiple store candidates share the version requested for a root.
    #[error("Ambiguous version for root artifact {reference}: multiple candidates share the requested version")]
    AmbiguousRoot { reference: String },

    /// The caller cancelled the run.
    #[error("Resolution cancelled")]
    Cancelled,

    /// The artifact store failed while resolving a root.
    #[error("Artifact store error: {message}")]
    Store { message: String },
}

/// Convenience alias used throughout the workspace.
pub type KarpResult<T> = Result<T, KarpError>;
