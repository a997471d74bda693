//! Dependency resolution engine for knowledge artifacts: dependency edge
//! extraction, exact/latest version selection, cycle-safe depth-first
//! traversal, and diagnostics accumulation.

pub mod diagnostics;
pub mod extract;
pub mod graph;
pub mod store;
pub mod version;
pub mod walker;
