//! apidiff Engine - Orchestration layer
//!
//! Coordinates the core diff logic with the SQLite store behind two entry
//! points: `apply_engine_query` for reads and `apply_engine_command` for
//! writes.

pub mod commands;
