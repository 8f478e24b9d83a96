//! API version diff engine.
//!
//! Compares two snapshots of one logical API and produces a structured,
//! deterministic diff with classified breaking changes.
//!
//! ## Entry point
//!
//! ```ignore
//! use apidiff_core::diff::engine::compute_diff;
//!
//! let diff = compute_diff(&from_snapshot, &to_snapshot);
//! let summary = apidiff_core::diff::human_summary::render_human_summary(&diff);
//! ```
//!
//! ## Guarantees
//!
//! - **Partition**: every identity key of either snapshot lands in exactly one
//!   of added, removed, modified, or unchanged.
//! - **Determinism**: identical inputs produce identical output, in
//!   reconciler order.
//! - **Shadowing**: a repeated identity key within one snapshot resolves to
//!   its last definition.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_diff, compute_diff_bytes, diff_snapshots};
pub use human_summary::render_human_summary;
pub use model::ApiDiffResult;
