//! Import of `mock-api-definition` files
//!
//! Provides:
//! - The definition file format
//! - JSON/YAML parser with validation
//! - Definition digest canonicalization
//! - Importer storing a definition as the new latest version

pub mod digest;
pub mod format;
pub mod importer;
pub mod parser;

pub use digest::compute_definition_digest;
pub use format::{ApiDefinitionFile, ApiMeta};
pub use importer::{import_api_file, import_definition, ImportOutcome};
pub use parser::{parse_api_file, parse_api_str, FileFormat};
