//! Serde model of the OpenAPI 3.x document, plus `$ref` lookup.

pub mod content;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod schema;
pub mod spec;

use std::path::Path;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Serialization of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// Deserialize a document and check that it is OpenAPI 3.x.
pub fn parse(input: &str, format: Format) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = match format {
        Format::Yaml => serde_yaml_ng::from_str(input)?,
        Format::Json => serde_json::from_str(input)?,
    };
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi));
    }
    Ok(spec)
}

pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    parse(input, Format::Yaml)
}

pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    parse(input, Format::Json)
}
