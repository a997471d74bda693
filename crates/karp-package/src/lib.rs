//! Deployable package assembly and manifest inference.
//!
//! Consumes the resolver's ordered artifact list and renders it into a
//! bundle of create/upsert operations, or infers a shallow manifest of one
//! module's direct, version-pinned dependencies.

pub mod assembler;
pub mod manifest;
