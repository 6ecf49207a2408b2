//! Target platforms and the target registry.
//!
//! A target is data: its descriptor schema, template, constants, and archive
//! classifier. Adding a platform means registering one more [`TargetSpec`],
//! not writing a new build path.

use crate::descriptor::{RenderContext, TemplateValue};
use crate::{BuildError, Result};

/// How descriptor values are substituted into a target's template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorSyntax {
    /// Every value is rendered as a JSON token (quoted and escaped).
    Json,
    /// Values are substituted verbatim, lists as `[a, b]`.
    Relaxed,
}

/// One deployment platform the orchestrator can build for.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    /// Registry key (e.g., "spigot").
    pub id: String,

    /// Human-readable name, used in logs and CLI output.
    pub display_name: String,

    /// Suffix for the output archive name (e.g., "spigot" in
    /// `Demo-1.0-spigot.jar`).
    pub classifier: String,

    /// Archive-relative path of the generated descriptor.
    pub descriptor_path: String,

    /// Substitution rules for the descriptor template.
    pub syntax: DescriptorSyntax,

    /// Descriptor template with `${key}` placeholders.
    pub template: String,

    /// Target-fixed values injected into the render context (entrypoint
    /// class names, API compatibility versions). These are not
    /// user-configurable.
    pub constants: RenderContext,

    /// Whether `build_all` includes this target. An explicit
    /// `build_target` request ignores this flag.
    pub enabled: bool,
}

impl TargetSpec {
    /// Create an enabled target spec with no constants.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        classifier: impl Into<String>,
        descriptor_path: impl Into<String>,
        syntax: DescriptorSyntax,
        template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            classifier: classifier.into(),
            descriptor_path: descriptor_path.into(),
            syntax,
            template: template.into(),
            constants: RenderContext::new(),
            enabled: true,
        }
    }

    /// Bind a target-fixed constant for descriptor rendering.
    #[must_use]
    pub fn with_constant(mut self, key: impl Into<String>, value: TemplateValue) -> Self {
        self.constants.insert(key, value);
        self
    }

    /// Mark the target as excluded from `build_all`.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Ordered set of known targets, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    specs: Vec<TargetSpec>,
}

const SPIGOT_MAIN_CLASS: &str = "org.pistonworks.core.spigot.PistonCoreSpigotPlugin";
const SPIGOT_API_VERSION: &str = "1.19";
const FABRIC_SERVER_ENTRYPOINT: &str = "org.pistonworks.core.fabric.PistonCoreFabricMod";
const FABRIC_LOADER_REQUIREMENT: &str = ">=0.14.0";
const FABRIC_MINECRAFT_REQUIREMENT: &str = ">=1.19";

const SPIGOT_TEMPLATE: &str = "\
name: ${name}
version: ${version}
description: ${description}
main: ${main_class}
authors: ${authors}
api-version: ${api_version}
depend: []
";

const FABRIC_TEMPLATE: &str = r#"{
  "schemaVersion": ${schema_version},
  "id": ${id},
  "version": ${version},
  "name": ${name},
  "description": ${description},
  "environment": ${environment},
  "entrypoints": {
    "server": ${server_entrypoints}
  },
  "depends": {
    "fabricloader": ${loader_requirement},
    "minecraft": ${minecraft_requirement}
  }
}
"#;

impl TargetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// Registry with the built-in targets: Spigot (enabled) and Fabric
    /// (registered, but kept out of `build_all` until the Fabric runtime
    /// layer ships).
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            specs: vec![spigot_spec(), fabric_spec()],
        }
    }

    /// Register a target. Ids must be unique.
    pub fn register(&mut self, spec: TargetSpec) -> Result<()> {
        if self.get(&spec.id).is_some() {
            return Err(BuildError::DuplicateTargetId { id: spec.id });
        }

        self.specs.push(spec);
        Ok(())
    }

    /// Look up a target by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TargetSpec> {
        self.specs.iter().find(|spec| spec.id == id)
    }

    /// Toggle a target without deregistering it.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<()> {
        let spec = self
            .specs
            .iter_mut()
            .find(|spec| spec.id == id)
            .ok_or_else(|| BuildError::TargetNotFound { id: id.to_string() })?;

        spec.enabled = enabled;
        Ok(())
    }

    /// All registered targets, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetSpec> {
        self.specs.iter()
    }

    /// Targets included in `build_all`, in registration order.
    pub fn enabled(&self) -> impl Iterator<Item = &TargetSpec> {
        self.specs.iter().filter(|spec| spec.enabled)
    }

    /// Number of registered targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn spigot_spec() -> TargetSpec {
    TargetSpec::new(
        "spigot",
        "Spigot",
        "spigot",
        "plugin.yml",
        DescriptorSyntax::Relaxed,
        SPIGOT_TEMPLATE,
    )
    .with_constant("main_class", TemplateValue::str(SPIGOT_MAIN_CLASS))
    .with_constant("api_version", TemplateValue::str(SPIGOT_API_VERSION))
}

fn fabric_spec() -> TargetSpec {
    TargetSpec::new(
        "fabric",
        "Fabric",
        "fabric",
        "fabric.mod.json",
        DescriptorSyntax::Json,
        FABRIC_TEMPLATE,
    )
    .with_constant("schema_version", TemplateValue::int(1))
    .with_constant("environment", TemplateValue::str("server"))
    .with_constant(
        "server_entrypoints",
        TemplateValue::list([FABRIC_SERVER_ENTRYPOINT]),
    )
    .with_constant(
        "loader_requirement",
        TemplateValue::str(FABRIC_LOADER_REQUIREMENT),
    )
    .with_constant(
        "minecraft_requirement",
        TemplateValue::str(FABRIC_MINECRAFT_REQUIREMENT),
    )
    .disabled()
}
