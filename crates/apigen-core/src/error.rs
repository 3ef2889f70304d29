use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// A document inconsistency found while building the descriptor graph.
///
/// Every variant is fatal for the run and names the document location
/// (a JSON pointer) where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unsupported schema at {location}: {detail}")]
    UnsupportedSchemaShape { location: String, detail: String },

    #[error("unsupported media type `{media_type}` at {location}")]
    UnsupportedMediaType {
        location: String,
        media_type: String,
    },

    #[error(
        "status `{status}` at {location} has no payload and no well-known name (known: 200, 201, 302, 404, default)"
    )]
    UnresolvableStatusCode { location: String, status: String },

    #[error("invalid operation at {location}: {detail}")]
    MissingRequiredOperationShape { location: String, detail: String },

    #[error("duplicate operationId `{operation_id}` at {second} (first declared at {first})")]
    DuplicateOperationId {
        operation_id: String,
        first: String,
        second: String,
    },

    #[error("unresolved reference at {location}: {reference}")]
    UnresolvedReference { location: String, reference: String },

    #[error("generated name `{name}` is used by both {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Failure inside a code generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template `{template}` failed: {message}")]
    Template { template: String, message: String },

    #[error("generation failed: {0}")]
    Other(String),
}
