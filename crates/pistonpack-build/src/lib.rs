//! Multi-target build orchestration for Piston Core plugins
//!
//! One compiled plugin source tree goes in; one distributable archive per
//! target platform comes out, each with its own generated descriptor and
//! bundling policy. The pipeline per target:
//!
//! ```text
//! manifest (piston-core.toml)
//!     │ load
//!     ▼
//! bundle dependency sources ── first-wins, lexicographic staging
//!     │
//!     ▼
//! render descriptor ─────────── plugin.yml / fabric.mod.json
//!     │
//!     ▼
//! assemble archive ──────────── build/libs/<name>-<version>-<classifier>.jar
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pistonpack_build::{BuildConfig, Orchestrator};
//!
//! let config = BuildConfig::from_file("pistonpack.toml")?;
//! let orchestrator = Orchestrator::new(config);
//!
//! for result in orchestrator.build_all() {
//!     match &result.outcome {
//!         Ok(artifact) => println!("{}: {}", result.target_id, artifact.archive_path.display()),
//!         Err(err) => eprintln!("{}: {err}", result.target_id),
//!     }
//! }
//! # Ok::<(), pistonpack_build::BuildError>(())
//! ```

mod error;

pub mod archive;
pub mod config;
pub mod descriptor;
pub mod manifest;
pub mod orchestrator;
pub mod stage;
pub mod target;

pub use archive::{BuildArtifact, assemble};
pub use config::{BuildConfig, ProjectSection, SourcesSection, TargetSources};
pub use descriptor::{GeneratedDescriptor, RenderContext, TemplateValue, render};
pub use error::BuildError;
pub use manifest::Manifest;
pub use orchestrator::{BuildResult, BuildState, Orchestrator};
pub use stage::{DependencySource, StagedFileSet, bundle};
pub use target::{DescriptorSyntax, TargetRegistry, TargetSpec};

/// Result type for build operations.
pub type Result<T, E = BuildError> = std::result::Result<T, E>;

/// Conventional project-relative path of the plugin manifest.
pub const MANIFEST_FILE: &str = "piston-core.toml";

/// Conventional project-relative path of the build configuration.
pub const CONFIG_FILE: &str = "pistonpack.toml";
