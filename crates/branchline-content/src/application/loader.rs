//! Story parsing and loading.

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::info;

use crate::domain::story::StoryDefinition;
use crate::error::ContentError;

/// Serialization format of a story source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryFormat {
    /// YAML (`.yaml`, `.yml`).
    Yaml,
    /// JSON (`.json`).
    Json,
}

impl StoryFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::UnsupportedFormat` for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(ContentError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A parsed, validated story plus the fingerprint of its source.
#[derive(Debug, Clone)]
pub struct LoadedStory {
    /// The story content.
    pub definition: StoryDefinition,
    /// Hex SHA-256 of the raw source text.
    pub version_hash: String,
}

/// Parses a story from YAML without validating references.
///
/// # Errors
///
/// Returns `ContentError::Yaml` if the source does not match the model.
pub fn parse_story_yaml(source: &str) -> Result<StoryDefinition, ContentError> {
    Ok(serde_yaml::from_str(source)?)
}

/// Parses a story from JSON without validating references.
///
/// # Errors
///
/// Returns `ContentError::Json` if the source does not match the model.
pub fn parse_story_json(source: &str) -> Result<StoryDefinition, ContentError> {
    Ok(serde_json::from_str(source)?)
}

/// Parses, validates and fingerprints a story held in memory.
///
/// # Errors
///
/// Returns a parse error or `ContentError::Invalid`.
pub fn load_story_from_str(source: &str, format: StoryFormat) -> Result<LoadedStory, ContentError> {
    let definition = match format {
        StoryFormat::Yaml => parse_story_yaml(source)?,
        StoryFormat::Json => parse_story_json(source)?,
    };
    definition.validate()?;

    let version_hash = version_hash(source);
    info!(
        title = definition.title.as_deref().unwrap_or("untitled"),
        steps = definition.steps.len(),
        version_hash = %version_hash,
        "loaded story"
    );

    Ok(LoadedStory {
        definition,
        version_hash,
    })
}

/// Reads, parses, validates and fingerprints a story file.
///
/// # Errors
///
/// Returns `ContentError::Io` if the file cannot be read,
/// `ContentError::UnsupportedFormat` for an unknown extension, a parse
/// error, or `ContentError::Invalid`.
pub fn load_story(path: impl AsRef<Path>) -> Result<LoadedStory, ContentError> {
    let path = path.as_ref();
    let format = StoryFormat::from_path(path)?;
    let source = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_story_from_str(&source, format)
}

/// Hex-encoded SHA-256 of the story source.
#[must_use]
pub fn version_hash(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    format!("{digest:x}")
}
