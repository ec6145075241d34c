//! Error types for loading and building command definitions.
//!
//! Covers I/O and (de)serialization failures as well as declarations that
//! cannot be turned into a registry.

use std::path::PathBuf;

use argbind_core::SchemaError;
use thiserror::Error;

/// Errors that can occur while loading or building definitions.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension is neither YAML nor JSON.
    #[error("unsupported definition format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A property combines settings that do not fit its kind.
    #[error("invalid property {command}.{property}: {reason}")]
    InvalidProperty {
        command: String,
        property: String,
        reason: String,
    },

    /// The declared commands violate a structural rule.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Convenience alias for results with [`DefinitionError`].
pub type Result<T> = std::result::Result<T, DefinitionError>;
