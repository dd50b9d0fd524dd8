//! Content error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a story.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The story file could not be read.
    #[error("failed to read story {path}: {source}")]
    Io {
        /// The path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The YAML source is malformed or does not match the story model.
    #[error("invalid story YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON source is malformed or does not match the story model.
    #[error("invalid story JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a supported format.
    #[error("unsupported story format: {0}")]
    UnsupportedFormat(String),

    /// The story parsed but references content that does not exist.
    #[error("story failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
