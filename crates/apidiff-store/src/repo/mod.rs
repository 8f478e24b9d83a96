//! Repository layer: versioned API definitions in SQLite
//!
//! - `hydration`: row reads and snapshot loading
//! - `sqlite_repo`: version writes
//! - `registry`: the core registry traits over a connection

pub mod hydration;
pub mod registry;
pub mod sqlite_repo;

pub use hydration::ApiVersionRow;
pub use registry::SqliteRegistry;
pub use sqlite_repo::{SqliteRepo, VersionMeta};
