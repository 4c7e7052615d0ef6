//! Decides whether a completed operation gets shaped at all.

use http::Method;
use serde_json::Value;

use crate::config::JsonApiConfig;

/// Why a response was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// DELETE, PUT and HEAD carry no body worth shaping.
    BodylessMethod,
    /// A single-record lookup came back `null`; the host reports 404.
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Skip(SkipReason),
    Transform,
}

impl Classification {
    #[must_use]
    pub fn is_transform(self) -> bool {
        matches!(self, Classification::Transform)
    }
}

#[must_use]
pub fn is_bodyless_method(method: &Method) -> bool {
    matches!(*method, Method::DELETE | Method::PUT | Method::HEAD)
}

/// Classify a completed operation. Total over all inputs.
#[must_use]
pub fn classify(
    method: &Method,
    operation: &str,
    result: &Value,
    config: &JsonApiConfig,
) -> Classification {
    if is_bodyless_method(method) {
        return Classification::Skip(SkipReason::BodylessMethod);
    }
    if result.is_null() && config.is_single_record_lookup(operation) {
        return Classification::Skip(SkipReason::NotFound);
    }
    Classification::Transform
}
