//! Remote operation metadata.
//!
//! Relationship accessors follow the `__<verb>__<relation>` naming
//! convention, optionally qualified by the owning model, e.g.
//! `post.prototype.__get__comments`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static ACCESSOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:.*\.)?__([A-Za-z]+)__(.+)$").expect("static regex should not panic")
});

/// Describes the operation that produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Model whose endpoint was hit
    pub model: String,
    /// Operation name, e.g. `findById` or `__get__comments`
    pub name: String,
    /// Model named in the declared return shape, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
}

impl OperationDescriptor {
    #[must_use]
    pub fn new(model: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            name: name.into(),
            returns: None,
        }
    }

    #[must_use]
    pub fn with_returns(mut self, model: impl Into<String>) -> Self {
        self.returns = Some(model.into());
        self
    }

    #[must_use]
    pub fn accessor(&self) -> Option<RelationshipAccessor<'_>> {
        RelationshipAccessor::parse(&self.name)
    }

    #[must_use]
    pub fn is_relationship_accessor(&self) -> bool {
        is_relationship_accessor(&self.name)
    }

    /// Related model for relationship accessors; `None` for plain operations.
    #[must_use]
    pub fn related_model_name(&self) -> Option<&str> {
        if self.is_relationship_accessor() {
            self.returns.as_deref()
        } else {
            None
        }
    }
}

/// A parsed relationship accessor name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipAccessor<'a> {
    pub verb: &'a str,
    pub relation: &'a str,
}

impl<'a> RelationshipAccessor<'a> {
    #[must_use]
    pub fn parse(name: &'a str) -> Option<Self> {
        let caps = ACCESSOR_REGEX.captures(name)?;
        Some(Self {
            verb: caps.get(1)?.as_str(),
            relation: caps.get(2)?.as_str(),
        })
    }
}

#[must_use]
pub fn is_relationship_accessor(name: &str) -> bool {
    ACCESSOR_REGEX.is_match(name)
}
