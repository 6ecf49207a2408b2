//! Project build configuration.
//!
//! `pistonpack.toml` names everything the orchestrator consumes from its
//! collaborators: the compiled-output directories produced by the source
//! compiler, the resolved runtime classpath, per-target implementation
//! entries, and the embedded framework version. The orchestration core
//! never triggers compilation or dependency resolution itself.

use crate::{BuildError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything one build invocation needs to know about the project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    pub project: ProjectSection,

    pub sources: SourcesSection,

    /// Per-target implementation entries, keyed by target id.
    #[serde(default)]
    pub targets: BTreeMap<String, TargetSources>,
}

/// Project-level settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectSection {
    /// Path to the platform-agnostic plugin manifest.
    pub manifest: PathBuf,

    /// Directory that receives the output archives.
    pub output_dir: PathBuf,

    /// Version of the embedded framework. Carried by the invocation, not
    /// compiled into the core, so the tool works across framework releases.
    pub core_version: String,
}

/// Compiled outputs and resolved libraries shared by every target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourcesSection {
    /// The plugin's own compiled-output directory. Highest bundling
    /// priority.
    pub classes: PathBuf,

    /// Shared/common module output, staged after `classes`.
    #[serde(default)]
    pub common: Option<PathBuf>,

    /// Resolved runtime classpath archives, expanded after every directory
    /// source, in the order the resolver produced them.
    #[serde(default)]
    pub runtime: Vec<PathBuf>,
}

/// Implementation entries bundled only for one target.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetSources {
    /// Directories or archives supplying the target's platform adapter.
    #[serde(default, rename = "impl")]
    pub implementation: Vec<PathBuf>,
}

impl BuildConfig {
    /// Load a build configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse configuration content, reporting errors against `path`.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|err| BuildError::ConfigParse {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        })
    }

    /// Implementation entries configured for `target_id`, if any.
    #[must_use]
    pub fn target_sources(&self, target_id: &str) -> &[PathBuf] {
        self.targets
            .get(target_id)
            .map(|sources| sources.implementation.as_slice())
            .unwrap_or_default()
    }
}
