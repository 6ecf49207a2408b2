//! Descriptor generation.
//!
//! Renders the platform-agnostic [`Manifest`] into a target's descriptor
//! file (`plugin.yml`, `fabric.mod.json`). Escaping is a property of the
//! target's [`DescriptorSyntax`], not of the call site: JSON targets always
//! receive JSON-encoded tokens, relaxed targets receive raw substitution.

use crate::manifest::Manifest;
use crate::target::{DescriptorSyntax, TargetSpec};
use crate::{BuildError, Result};
use std::collections::BTreeMap;

/// A typed value bound to a template placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    Str(String),
    Int(i64),
    List(Vec<String>),
}

impl TemplateValue {
    /// String value.
    #[must_use]
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Integer value.
    #[must_use]
    pub fn int(value: i64) -> Self {
        Self::Int(value)
    }

    /// List-of-strings value.
    #[must_use]
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Encode this value as a template substitution token.
    fn encode(&self, syntax: DescriptorSyntax) -> Result<String> {
        match syntax {
            DescriptorSyntax::Json => Ok(match self {
                Self::Str(value) => serde_json::to_string(value)?,
                Self::Int(value) => value.to_string(),
                Self::List(values) => serde_json::to_string(values)?,
            }),
            DescriptorSyntax::Relaxed => Ok(match self {
                Self::Str(value) => value.clone(),
                Self::Int(value) => value.to_string(),
                Self::List(values) => format!("[{}]", values.join(", ")),
            }),
        }
    }
}

/// Ordered placeholder bindings for one render call.
///
/// Later inserts override earlier ones, so invocation-supplied extras win
/// over target constants, which win over manifest-derived values.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    values: BTreeMap<String, TemplateValue>,
}

impl RenderContext {
    /// Empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value to a placeholder key.
    pub fn insert(&mut self, key: impl Into<String>, value: TemplateValue) {
        self.values.insert(key.into(), value);
    }

    /// Look up a bound value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.values.get(key)
    }

    /// Copy every binding from `other` into this context.
    pub fn merge(&mut self, other: &RenderContext) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }
}

/// Rendered descriptor content plus its archive-relative path.
///
/// Produced fresh per build; never cached, since it embeds the manifest
/// version and target constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDescriptor {
    pub archive_path: String,
    pub content: String,
}

/// Render the target's descriptor from the manifest and extra bindings.
///
/// Deterministic: identical inputs produce byte-identical content.
pub fn render(
    manifest: &Manifest,
    spec: &TargetSpec,
    extra: &RenderContext,
) -> Result<GeneratedDescriptor> {
    let mut context = RenderContext::new();
    context.insert("name", TemplateValue::str(&manifest.name));
    context.insert("version", TemplateValue::str(&manifest.version));
    context.insert("description", TemplateValue::str(&manifest.description));
    context.insert("authors", TemplateValue::list(manifest.authors.clone()));
    context.insert("id", TemplateValue::str(manifest.id()));
    context.merge(&spec.constants);
    context.merge(extra);

    let content = substitute(&spec.template, &context, spec.syntax)?;

    Ok(GeneratedDescriptor {
        archive_path: spec.descriptor_path.clone(),
        content,
    })
}

/// Replace every `${key}` in `template` with its encoded binding.
fn substitute(
    template: &str,
    context: &RenderContext,
    syntax: DescriptorSyntax,
) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let end = after.find('}').ok_or_else(|| BuildError::DescriptorRender {
            placeholder: after.lines().next().unwrap_or(after).to_string(),
        })?;

        let key = &after[..end];
        let value = context
            .get(key)
            .ok_or_else(|| BuildError::DescriptorRender {
                placeholder: key.to_string(),
            })?;

        output.push_str(&value.encode(syntax)?);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}
