//! Plugin manifest loading.
//!
//! The manifest is the single platform-agnostic source of plugin metadata,
//! read from `piston-core.toml` in the plugin project. Every target
//! descriptor is generated from it.

use crate::{BuildError, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

/// Platform-agnostic plugin metadata.
///
/// Loaded fresh for every target build so manifest edits are picked up
/// without restarting the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Plugin name (e.g., "Demo").
    pub name: String,

    /// Plugin version (e.g., "1.0").
    pub version: String,

    /// Short human-readable description.
    pub description: String,

    /// List of authors. May be written as a single string in the manifest.
    pub authors: Vec<String>,
}

/// Raw on-disk shape. Required keys are validated after parsing so a missing
/// key reports `ManifestMissingField` rather than a generic parse error.
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    version: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    authors: Option<Authors>,
}

/// `authors` accepts either a bare string or a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Authors {
    One(String),
    Many(Vec<String>),
}

impl Authors {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(author) => vec![author],
            Self::Many(authors) => authors,
        }
    }
}

impl Manifest {
    /// Load and validate a manifest from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(BuildError::ManifestNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        Self::parse(&content, path)
    }

    /// Parse manifest content, reporting errors against `path`.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest =
            toml::from_str(content).map_err(|err| BuildError::ManifestParse {
                path: path.to_path_buf(),
                message: err.message().to_string(),
            })?;

        Ok(Self {
            name: required(raw.name, "name")?,
            version: required(raw.version, "version")?,
            description: required(raw.description, "description")?,
            authors: raw.authors.map(Authors::into_vec).unwrap_or_default(),
        })
    }

    /// Platform identifier derived from the name (lowercased).
    #[must_use]
    pub fn id(&self) -> String {
        self.name.to_lowercase()
    }
}

/// An absent or empty required key is reported as missing.
fn required(value: Option<String>, field: &'static str) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(BuildError::ManifestMissingField { field }),
    }
}
