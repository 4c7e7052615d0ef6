//! JSON:API wire types.
//!
//! Only the subset of the media type needed for primary data and links is
//! modelled here: no `included`, `meta` or `relationships` members.

use serde::Serialize;
use serde_json::{Map, Value};

/// Top-level JSON:API document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub data: PrimaryData,
    #[serde(skip_serializing_if = "TopLevelLinks::is_empty")]
    pub links: TopLevelLinks,
}

impl Document {
    /// Serialize into a `serde_json::Value`.
    ///
    /// # Errors
    /// Returns a serialization error if a member cannot be represented as JSON.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Primary data of a document: `null`, a single resource or a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Null,
    Single(Box<ResourceObject>),
    Many(Vec<ResourceObject>),
}

impl PrimaryData {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, PrimaryData::Null)
    }

    /// Number of resource objects carried (0 for `null`).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            PrimaryData::Null => 0,
            PrimaryData::Single(_) => 1,
            PrimaryData::Many(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every resource object regardless of shape.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceObject> {
        let slice: &[ResourceObject] = match self {
            PrimaryData::Null => &[],
            PrimaryData::Single(item) => std::slice::from_ref(item.as_ref()),
            PrimaryData::Many(items) => items.as_slice(),
        };
        slice.iter()
    }

    /// Mutable counterpart of [`PrimaryData::resources`].
    pub fn resources_mut(&mut self) -> impl Iterator<Item = &mut ResourceObject> {
        let slice: &mut [ResourceObject] = match self {
            PrimaryData::Null => &mut [],
            PrimaryData::Single(item) => std::slice::from_mut(item.as_mut()),
            PrimaryData::Many(items) => items.as_mut_slice(),
        };
        slice.iter_mut()
    }
}

/// A resource object. With `attributes` and `links` removed it doubles as a
/// resource identifier object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ResourceLinks>,
}

impl ResourceObject {
    /// Reduce to a resource identifier (`id` and `type` only).
    pub fn strip_to_identifier(&mut self) {
        self.attributes = None;
        self.links = None;
    }

    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.attributes.is_none() && self.links.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Top-level `links` member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TopLevelLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

impl TopLevelLinks {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.self_link.is_none() && self.related.is_none()
    }
}
