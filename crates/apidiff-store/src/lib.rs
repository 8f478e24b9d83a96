//! apidiff Store - SQLite persistence for versioned API definitions
//!
//! Provides:
//! - SQLite schema with an embedded, checksummed migrations framework
//! - `SqliteRegistry`, the SQLite implementation of the core registry traits
//! - Version writes: inserting snapshots and cloning the latest version
//! - Import of `mock-api-definition` files (JSON or YAML)

pub mod db;
pub mod errors;
pub mod import;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::{SqliteRegistry, SqliteRepo};
