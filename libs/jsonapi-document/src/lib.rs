#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! JSON:API document model and the default resource serializer.
//!
//! The crate is deliberately framework-free: it turns plain JSON records into
//! [`Document`] values given a type name and [`SerializationOptions`]. Callers
//! that need HTTP integration (content negotiation, link reconstruction) layer
//! it on top.
pub mod builder;
pub mod document;
pub mod options;

pub use builder::{DocumentBuilder, JsonApiSerializer};
pub use document::{Document, PrimaryData, ResourceLinks, ResourceObject, TopLevelLinks};
pub use options::{KeyCase, LinkFn, Record, SerializationOptions};

/// Media type registered for JSON:API payloads.
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Errors produced while building a JSON:API document.
///
/// Builders refuse top-level shapes they cannot represent. Record-level gaps
/// such as a missing identity degrade to a best-effort resource instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("top-level data must not be null")]
    NullData,

    #[error("unsupported top-level data: expected object or array, got {0}")]
    UnsupportedData(&'static str),

    #[error("record at index {index} is not an object")]
    RecordNotObject { index: usize },
}

/// Short name of a JSON value's kind, used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
