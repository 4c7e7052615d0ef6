//! Type and attribute resolution.
//!
//! A relationship accessor returns records of the related model, so type
//! and attributes come from that model rather than the one whose endpoint
//! was hit. Registry misses degrade: unknown models contribute no
//! attributes, and an unresolvable related plural falls back to the
//! queried model's type.

use crate::naming::Pluralizer;
use crate::operation::OperationDescriptor;
use crate::registry::{ModelRegistry, attributes_without_identity, resolve_plural_path};

/// Outcome of resolution for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    /// JSON:API `type`, also the path segment used in per-record links
    pub type_name: String,
    /// Attribute keys to expose, identity excluded
    pub attributes: Vec<String>,
    pub is_relationship_traversal: bool,
}

/// Resolve type, attribute keys and traversal flag for `operation`.
#[must_use]
pub fn resolve(
    operation: &OperationDescriptor,
    registry: &dyn ModelRegistry,
    pluralizer: &dyn Pluralizer,
) -> ResolvedResource {
    let queried_type = queried_type(&operation.model, registry, pluralizer);

    if !operation.is_relationship_accessor() {
        return ResolvedResource {
            type_name: queried_type,
            attributes: attributes_for(&operation.model, registry),
            is_relationship_traversal: false,
        };
    }

    let related = operation.related_model_name();
    let related_type = related
        .and_then(|name| registry.lookup(name))
        .and_then(|model| resolve_plural_path(model, pluralizer));

    let type_name = related_type.unwrap_or_else(|| {
        tracing::debug!(
            operation = %operation.name,
            related = ?related,
            "related model has no resolvable plural, using queried type"
        );
        queried_type
    });

    ResolvedResource {
        type_name,
        attributes: related.map(|name| attributes_for(name, registry)).unwrap_or_default(),
        is_relationship_traversal: true,
    }
}

/// Plural path of the queried model, computed from its name when the
/// registry does not know it.
fn queried_type(model: &str, registry: &dyn ModelRegistry, pluralizer: &dyn Pluralizer) -> String {
    registry
        .lookup(model)
        .and_then(|descriptor| resolve_plural_path(descriptor, pluralizer))
        .unwrap_or_else(|| {
            let computed = pluralizer.pluralize(model);
            if computed.is_empty() {
                model.to_owned()
            } else {
                computed
            }
        })
}

fn attributes_for(model: &str, registry: &dyn ModelRegistry) -> Vec<String> {
    if let Some(descriptor) = registry.lookup(model) {
        attributes_without_identity(descriptor)
    } else {
        tracing::warn!(model, "model not found in registry, exposing no attributes");
        Vec::new()
    }
}
