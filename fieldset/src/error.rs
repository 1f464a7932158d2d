//! Error types for field definitions and the definition registry

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fieldset operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur outside the field lifecycle itself.
///
/// Resolving, filling and serializing a field never fail. These variants cover
/// loading definitions, reading configuration and parsing typed options.
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Resource definition not found by name
    #[error("resource not found: {name}")]
    ResourceNotFound { name: String },

    /// Two fields of one resource share an attribute
    #[error("duplicate attribute '{attribute}' in resource '{resource}'")]
    DuplicateAttribute { resource: String, attribute: String },

    /// Resource name unusable as a definition file name
    #[error("invalid resource name '{name}': must be non-empty without path separators or '..'")]
    InvalidResourceName { name: String },

    /// Preload string outside none|metadata|auto
    #[error("invalid preload value '{value}', expected one of: none, metadata, auto")]
    InvalidPreload { value: String },

    /// View string outside index|detail|create|update
    #[error("invalid view '{value}', expected one of: index, detail, create, update")]
    InvalidView { value: String },

    /// Definitions directory not found
    #[error("definitions directory not found: {path}")]
    NotInitialized { path: PathBuf },

    /// Configuration could not be extracted
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for FieldsError {
    fn from(err: figment::Error) -> Self {
        FieldsError::Config(Box::new(err))
    }
}
