//! Core data types for the KARP knowledge artifact packager.
//!
//! This crate defines the format-neutral representation of a versioned
//! clinical knowledge artifact: identity, canonical reference parsing,
//! declared dependency edges, manifest records, and the unified error type.
//!
//! This crate is intentionally free of I/O and traversal logic. Artifacts
//! are assumed to be already parsed from their wire format by the time
//! they reach these types.

pub mod artifact;
pub mod canonical;
pub mod error;
pub mod manifest;
pub mod reference;
