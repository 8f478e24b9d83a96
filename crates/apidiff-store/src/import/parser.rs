//! Definition file parser with validation
//!
//! Parses JSON or YAML and validates the file type, schema version, API slug
//! and every endpoint's method and path.

#![allow(clippy::result_large_err)]

use crate::errors::{import_validation, io_error, Result};
use crate::import::format::{ApiDefinitionFile, DEFINITION_FILE_TYPE, SUPPORTED_SCHEMA_VERSION};
use std::fs;
use std::path::Path;

/// Serialization format of a definition file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// `.json` is JSON; anything else is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }
}

/// Parse a definition file from a path
pub fn parse_api_file(path: &Path) -> Result<ApiDefinitionFile> {
    let content = fs::read_to_string(path).map_err(|e| io_error("import_read", e))?;
    parse_api_str(&content, FileFormat::from_path(path))
}

/// Parse a definition from a string
pub fn parse_api_str(content: &str, format: FileFormat) -> Result<ApiDefinitionFile> {
    let file: ApiDefinitionFile = match format {
        FileFormat::Json => serde_json::from_str(content)
            .map_err(|e| import_validation(&format!("JSON parse error: {}", e)))?,
        FileFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| import_validation(&format!("YAML parse error: {}", e)))?,
    };

    validate_definition(&file)?;

    Ok(file)
}

fn validate_definition(file: &ApiDefinitionFile) -> Result<()> {
    if file.file_type != DEFINITION_FILE_TYPE {
        return Err(import_validation(&format!(
            "Unsupported file type: {}. Expected {}",
            file.file_type, DEFINITION_FILE_TYPE
        )));
    }

    if file.schema_version != SUPPORTED_SCHEMA_VERSION {
        return Err(import_validation(&format!(
            "Unsupported schemaVersion: {}. Expected {}",
            file.schema_version, SUPPORTED_SCHEMA_VERSION
        )));
    }

    if file.api.slug.trim().is_empty() {
        return Err(import_validation("api.slug must not be empty"));
    }

    if file.api.version.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return Err(import_validation("api.version must not be empty when given"));
    }

    for (index, endpoint) in file.endpoints.iter().enumerate() {
        if endpoint.method.trim().is_empty() {
            return Err(import_validation(&format!(
                "endpoints[{}]: method must not be empty",
                index
            )));
        }
        if !endpoint.path.starts_with('/') {
            return Err(import_validation(&format!(
                "endpoints[{}]: path must start with '/', got '{}'",
                index, endpoint.path
            )));
        }
    }

    Ok(())
}
