//! Model metadata as consumed by the pipeline.
//!
//! The registry is owned by the host; the pipeline only ever reads from it.
//! Lookups are total: a missing model is `None`, never an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::naming::Pluralizer;

/// Name of the identity member on every model.
pub const IDENTITY_KEY: &str = "id";

/// Static metadata for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDescriptor {
    /// Canonical model name, e.g. `post`
    pub name: String,
    /// Explicit HTTP path override (`settings.http.path`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_path: Option<String>,
    /// Explicit plural override (`settings.plural`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    /// Plural declared on the nested model definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_plural: Option<String>,
    /// Declared property names, in declaration order
    pub properties: Vec<String>,
}

impl ModelDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_http_path(mut self, path: impl Into<String>) -> Self {
        self.http_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }

    #[must_use]
    pub fn with_definition_plural(mut self, plural: impl Into<String>) -> Self {
        self.definition_plural = Some(plural.into());
        self
    }

    #[must_use]
    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn declared_properties(&self) -> &[String] {
        &self.properties
    }
}

/// Read-only model lookup.
pub trait ModelRegistry: Send + Sync {
    fn lookup(&self, name: &str) -> Option<&ModelDescriptor>;

    /// All registered models, in no particular order.
    fn models(&self) -> Box<dyn Iterator<Item = &ModelDescriptor> + '_>;

    /// Find the model whose definition declares `plural`.
    fn lookup_by_plural(&self, plural: &str) -> Option<&ModelDescriptor> {
        self.models()
            .find(|model| model.definition_plural.as_deref() == Some(plural))
    }
}

/// `HashMap`-backed registry keyed by canonical model name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryModelRegistry {
    models: HashMap<String, ModelDescriptor>,
}

impl InMemoryModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model, replacing any previous model of the same name.
    pub fn register(&mut self, model: ModelDescriptor) {
        self.models.insert(model.name.clone(), model);
    }

    #[must_use]
    pub fn with_model(mut self, model: ModelDescriptor) -> Self {
        self.register(model);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl FromIterator<ModelDescriptor> for InMemoryModelRegistry {
    fn from_iter<T: IntoIterator<Item = ModelDescriptor>>(iter: T) -> Self {
        let mut registry = Self::new();
        for model in iter {
            registry.register(model);
        }
        registry
    }
}

impl ModelRegistry for InMemoryModelRegistry {
    fn lookup(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.get(name)
    }

    fn models(&self) -> Box<dyn Iterator<Item = &ModelDescriptor> + '_> {
        Box::new(self.models.values())
    }
}

/// Resolve the public plural path of a model.
///
/// Priority: HTTP path override, plural override, definition plural, then
/// the pluralized canonical name. Slashes around an HTTP path are trimmed.
/// An empty outcome is `None`.
#[must_use]
pub fn resolve_plural_path(
    model: &ModelDescriptor,
    pluralizer: &dyn Pluralizer,
) -> Option<String> {
    let resolved = model
        .http_path
        .as_deref()
        .map(|path| path.trim_matches('/').to_owned())
        .or_else(|| model.plural.clone())
        .or_else(|| model.definition_plural.clone())
        .unwrap_or_else(|| pluralizer.pluralize(&model.name));

    (!resolved.is_empty()).then_some(resolved)
}

/// Declared properties minus the identity key, in declaration order.
#[must_use]
pub fn attributes_without_identity(model: &ModelDescriptor) -> Vec<String> {
    model
        .declared_properties()
        .iter()
        .filter(|name| name.as_str() != IDENTITY_KEY)
        .cloned()
        .collect()
}
