//! Target build orchestration.
//!
//! Runs the per-target pipeline (load manifest, bundle dependencies, render
//! descriptor, assemble archive) and aggregates one [`BuildResult`] per
//! requested target. `build_all` never short-circuits: a failed target is
//! captured in its result and the remaining targets still build.

use crate::archive::{self, BuildArtifact};
use crate::config::BuildConfig;
use crate::descriptor::{self, RenderContext, TemplateValue};
use crate::manifest::Manifest;
use crate::stage::{self, DependencySource};
use crate::target::{TargetRegistry, TargetSpec};
use crate::{BuildError, Result};

/// Pipeline position of one target build. Transitions are strictly
/// sequential; a target never assembles before it has bundled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Pending,
    Loading,
    Bundling,
    Rendering,
    Assembling,
    Succeeded,
    Failed,
}

/// Outcome of one target build.
#[derive(Debug)]
pub struct BuildResult {
    /// Id of the target this result belongs to.
    pub target_id: String,

    /// The produced artifact, or the error that failed this target.
    pub outcome: Result<BuildArtifact>,
}

impl BuildResult {
    /// Whether this target built successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The artifact, if the target succeeded.
    #[must_use]
    pub fn artifact(&self) -> Option<&BuildArtifact> {
        self.outcome.as_ref().ok()
    }

    /// The error, if the target failed.
    #[must_use]
    pub fn error(&self) -> Option<&BuildError> {
        self.outcome.as_ref().err()
    }
}

/// Drives target builds against one project configuration.
///
/// Targets are mutually independent (disjoint staged sets and output
/// paths), so builds run one after another with no shared mutable state.
#[derive(Debug)]
pub struct Orchestrator {
    config: BuildConfig,
    registry: TargetRegistry,
}

impl Orchestrator {
    /// Orchestrator over the built-in target registry.
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self::with_registry(config, TargetRegistry::builtin())
    }

    /// Orchestrator over a caller-supplied registry.
    #[must_use]
    pub fn with_registry(config: BuildConfig, registry: TargetRegistry) -> Self {
        Self { config, registry }
    }

    /// The target registry.
    #[must_use]
    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Mutable access to the target registry.
    pub fn registry_mut(&mut self) -> &mut TargetRegistry {
        &mut self.registry
    }

    /// Build one target by id, whether or not it is enabled.
    ///
    /// An unknown id is a registry misconfiguration and is raised rather
    /// than captured in a result.
    pub fn build_target(&self, id: &str) -> Result<BuildResult> {
        let spec = self
            .registry
            .get(id)
            .ok_or_else(|| BuildError::TargetNotFound { id: id.to_string() })?;

        Ok(self.build_spec(spec))
    }

    /// Build every enabled target in registry order, continuing past
    /// failures. Returns one result per attempted target.
    pub fn build_all(&self) -> Vec<BuildResult> {
        self.registry
            .enabled()
            .map(|spec| self.build_spec(spec))
            .collect()
    }

    fn build_spec(&self, spec: &TargetSpec) -> BuildResult {
        tracing::info!(target_id = %spec.id, "building target");

        let outcome = self.run_pipeline(spec);

        match &outcome {
            Ok(artifact) => {
                enter(spec, BuildState::Succeeded);
                tracing::info!(
                    target_id = %spec.id,
                    path = %artifact.archive_path.display(),
                    size = artifact.size_bytes,
                    entries = artifact.file_count,
                    "target built"
                );
            }
            Err(err) => {
                enter(spec, BuildState::Failed);
                tracing::warn!(target_id = %spec.id, error = %err, "target failed");
            }
        }

        BuildResult {
            target_id: spec.id.clone(),
            outcome,
        }
    }

    fn run_pipeline(&self, spec: &TargetSpec) -> Result<BuildArtifact> {
        enter(spec, BuildState::Pending);

        // The manifest is re-read for every target so edits land without a
        // restart, and a broken manifest fails each attempted target with
        // the same underlying error.
        enter(spec, BuildState::Loading);
        let manifest = Manifest::load(&self.config.project.manifest)?;

        enter(spec, BuildState::Bundling);
        let mut staged = stage::bundle(&self.dependency_sources(spec))?;

        enter(spec, BuildState::Rendering);
        let descriptor = descriptor::render(&manifest, spec, &self.extra_context())?;
        staged.insert_unique(descriptor.archive_path, descriptor.content.into_bytes())?;

        enter(spec, BuildState::Assembling);
        let output_path = self.config.project.output_dir.join(format!(
            "{}-{}-{}.jar",
            manifest.name, manifest.version, spec.classifier
        ));

        archive::assemble(&staged, &output_path)
    }

    /// Bundling inputs for one target, highest priority first: own
    /// compiled output, shared output, target implementation entries, then
    /// the external runtime classpath.
    fn dependency_sources(&self, spec: &TargetSpec) -> Vec<DependencySource> {
        let sources = &self.config.sources;
        let mut ordered = Vec::with_capacity(
            2 + self.config.target_sources(&spec.id).len() + sources.runtime.len(),
        );

        ordered.push(DependencySource::Directory(sources.classes.clone()));

        if let Some(common) = &sources.common {
            ordered.push(DependencySource::Directory(common.clone()));
        }

        for path in self.config.target_sources(&spec.id) {
            ordered.push(DependencySource::from_path(path.clone()));
        }

        for jar in &sources.runtime {
            ordered.push(DependencySource::Archive(jar.clone()));
        }

        ordered
    }

    /// Invocation-level bindings available to every descriptor template.
    fn extra_context(&self) -> RenderContext {
        let mut extra = RenderContext::new();
        extra.insert(
            "core_version",
            TemplateValue::str(&self.config.project.core_version),
        );
        extra
    }
}

fn enter(spec: &TargetSpec, state: BuildState) {
    tracing::debug!(target_id = %spec.id, state = ?state, "pipeline state");
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn demo_project(temp_dir: &TempDir) -> BuildConfig {
        let root = temp_dir.path();

        fs::create_dir_all(root.join("build/classes/com/demo")).unwrap();
        fs::write(
            root.join("build/classes/com/demo/Demo.class"),
            b"compiled demo",
        )
        .unwrap();

        fs::write(
            root.join("piston-core.toml"),
            r#"
name = "Demo"
version = "1.0"
description = "Test plugin"
authors = ["Ann"]
"#,
        )
        .unwrap();

        let content = format!(
            r#"
[project]
manifest = "{root}/piston-core.toml"
output-dir = "{root}/build/libs"
core-version = "0.6.0"

[sources]
classes = "{root}/build/classes"
"#,
            root = root.display()
        );

        BuildConfig::parse(&content, Path::new("pistonpack.toml")).unwrap()
    }

    #[test]
    fn Orchestrator___build_target___unknown_id___raises_target_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(demo_project(&temp_dir));

        let result = orchestrator.build_target("bungee");

        assert!(matches!(
            result.unwrap_err(),
            BuildError::TargetNotFound { .. }
        ));
    }

    #[test]
    fn Orchestrator___build_target___produces_named_archive() {
        let temp_dir = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(demo_project(&temp_dir));

        let result = orchestrator.build_target("spigot").unwrap();

        let artifact = result.artifact().unwrap();
        assert!(artifact.archive_path.ends_with("Demo-1.0-spigot.jar"));
        assert!(artifact.archive_path.exists());
        assert_eq!(artifact.file_count, 2); // class file + plugin.yml
    }

    #[test]
    fn Orchestrator___build_target___builds_disabled_target_on_explicit_request() {
        let temp_dir = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(demo_project(&temp_dir));

        let result = orchestrator.build_target("fabric").unwrap();

        assert!(result.is_success());
        assert!(
            result
                .artifact()
                .unwrap()
                .archive_path
                .ends_with("Demo-1.0-fabric.jar")
        );
    }

    #[test]
    fn Orchestrator___build_all___skips_disabled_targets() {
        let temp_dir = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(demo_project(&temp_dir));

        let results = orchestrator.build_all();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].target_id, "spigot");
        assert!(results[0].is_success());
    }

    #[test]
    fn Orchestrator___build_all___missing_manifest___fails_every_target() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = demo_project(&temp_dir);
        config.project.manifest = "/nonexistent/piston-core.toml".into();

        let mut orchestrator = Orchestrator::new(config);
        orchestrator
            .registry_mut()
            .set_enabled("fabric", true)
            .unwrap();

        let results = orchestrator.build_all();

        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(matches!(
                result.error(),
                Some(BuildError::ManifestNotFound { .. })
            ));
        }
    }
}
