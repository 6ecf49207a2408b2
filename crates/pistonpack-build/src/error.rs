//! Error types for build operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a target.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The plugin manifest file does not exist.
    #[error("Plugin manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// The plugin manifest is not valid TOML.
    #[error("Invalid plugin manifest {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// A required manifest key is absent or empty.
    #[error("Plugin manifest missing required field: {field}")]
    ManifestMissingField { field: &'static str },

    /// A descriptor template placeholder has no bound value.
    #[error("No value bound for descriptor placeholder: {placeholder}")]
    DescriptorRender { placeholder: String },

    /// A declared dependency source does not exist or cannot be opened.
    #[error("Dependency source unreadable: {}", path.display())]
    SourceUnreadable { path: PathBuf },

    /// Two staged entries normalize to the same archive path.
    #[error("Duplicate archive entry: {path}")]
    DuplicateArchiveEntry { path: String },

    /// A target with this id is already registered.
    #[error("Duplicate target id: {id}")]
    DuplicateTargetId { id: String },

    /// No target with this id is registered.
    #[error("Unknown target: {id}")]
    TargetNotFound { id: String },

    /// The project build configuration is not valid TOML.
    #[error("Invalid build configuration {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error while rendering a descriptor value.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
