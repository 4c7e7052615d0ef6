//! Options accepted by a [`DocumentBuilder`](crate::DocumentBuilder).

use std::fmt;
use std::sync::Arc;

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::TopLevelLinks;

/// A single input record as handed to per-record callbacks.
pub type Record = Map<String, Value>;

/// Per-record link generator (`dataLinks.self`).
pub type LinkFn = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// How attribute keys are re-cased on the way out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyCase {
    AsIs,
    #[default]
    DashCase,
    LowerCamelCase,
    SnakeCase,
}

impl KeyCase {
    #[must_use]
    pub fn apply(self, key: &str) -> String {
        match self {
            KeyCase::AsIs => key.to_owned(),
            KeyCase::DashCase => key.to_kebab_case(),
            KeyCase::LowerCamelCase => key.to_lower_camel_case(),
            KeyCase::SnakeCase => key.to_snake_case(),
        }
    }
}

/// Serialization options for one document.
#[derive(Clone)]
pub struct SerializationOptions {
    /// Name of the identity member on input records (default: `id`)
    pub id: String,
    /// Attribute keys to expose, in output order
    pub attributes: Vec<String>,
    pub top_level_links: TopLevelLinks,
    pub data_links: Option<LinkFn>,
    pub key_for_attribute: KeyCase,
}

impl Default for SerializationOptions {
    fn default() -> Self {
        Self {
            id: "id".to_owned(),
            attributes: Vec::new(),
            top_level_links: TopLevelLinks::default(),
            data_links: None,
            key_for_attribute: KeyCase::default(),
        }
    }
}

impl fmt::Debug for SerializationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationOptions")
            .field("id", &self.id)
            .field("attributes", &self.attributes)
            .field("top_level_links", &self.top_level_links)
            .field("data_links", &self.data_links.as_ref().map(|_| "<fn>"))
            .field("key_for_attribute", &self.key_for_attribute)
            .finish()
    }
}

impl SerializationOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_top_level_links(mut self, links: TopLevelLinks) -> Self {
        self.top_level_links = links;
        self
    }

    #[must_use]
    pub fn with_data_links<F>(mut self, self_link: F) -> Self
    where
        F: Fn(&Record) -> String + Send + Sync + 'static,
    {
        self.data_links = Some(Arc::new(self_link));
        self
    }

    #[must_use]
    pub fn with_key_for_attribute(mut self, case: KeyCase) -> Self {
        self.key_for_attribute = case;
        self
    }
}
