//! apidiff Core - API version diff and breaking-change detection
//!
//! This crate compares two snapshots of one logical API and reports:
//! - Added, removed, modified and unchanged endpoints, keyed by `METHOD:path`
//! - Field-level changes for endpoints present in both snapshots
//! - Breaking changes ranked by severity, from an extensible rule table
//! - A Markdown summary of the result
//!
//! Storage is reached only through the [`registry`] traits; an in-memory
//! implementation lives in [`memory`].

pub use apidiff_core_types as core_types;

pub mod classify;
pub mod compare;
pub mod diff;
pub mod errors;
pub mod identity;
pub mod logging_facility;
pub mod memory;
pub mod model;
pub mod reconcile;
pub mod registry;
pub mod versions;

// Re-export commonly used types
pub use diff::{compute_diff, render_human_summary, ApiDiffResult};
pub use errors::{ApiDiffError, ExError, ExErrorKind, Result};
pub use memory::InMemoryRegistry;
pub use model::{ApiIdentity, EndpointDefinition, ResponseDefinition, VersionSnapshot};
pub use registry::{SnapshotLoader, VersionRegistry};
pub use versions::{compare_versions, compare_with_latest, get_versions, LatestComparison};
