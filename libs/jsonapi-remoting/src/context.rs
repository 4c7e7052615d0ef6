//! Per-request unit of work handed to the pipeline.

use http::{HeaderMap, HeaderValue, Method, Uri, header};
use jsonapi_document::JSONAPI_MEDIA_TYPE;
use serde_json::Value;

use crate::operation::OperationDescriptor;

/// The inbound request URL, kept as the three pieces the host reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    pub scheme: String,
    pub host: String,
    /// Path plus query exactly as received (e.g. `/api/posts?filter=x`)
    pub original_url: String,
}

impl RequestUrl {
    #[must_use]
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        original_url: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            original_url: original_url.into(),
        }
    }

    /// Build from an `http::Uri`, keeping its path and query.
    #[must_use]
    pub fn from_uri(scheme: impl Into<String>, host: impl Into<String>, uri: &Uri) -> Self {
        let original_url = uri
            .path_and_query()
            .map_or_else(|| uri.path().to_owned(), |pq| pq.as_str().to_owned());
        Self::new(scheme, host, original_url)
    }

    /// Path component, without query or fragment.
    #[must_use]
    pub fn path(&self) -> &str {
        let end = self
            .original_url
            .find(['?', '#'])
            .unwrap_or(self.original_url.len());
        &self.original_url[..end]
    }

    /// Everything from the first `?` or `#` on, or `""`.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.original_url[self.path().len()..]
    }

    /// `scheme://host` followed by the original path and query, verbatim.
    #[must_use]
    pub fn href(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.original_url)
    }
}

/// One completed remote operation awaiting response shaping.
///
/// Everything is read-only to the pipeline except the result (replaced at
/// most once with the serialized document) and the response headers.
#[derive(Debug, Clone)]
pub struct OperationContext {
    method: Method,
    operation: OperationDescriptor,
    request: RequestUrl,
    result: Value,
    response_headers: HeaderMap,
    serialized: bool,
}

impl OperationContext {
    #[must_use]
    pub fn new(
        method: Method,
        operation: OperationDescriptor,
        request: RequestUrl,
        result: Value,
    ) -> Self {
        Self {
            method,
            operation,
            request,
            result,
            response_headers: HeaderMap::new(),
            serialized: false,
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn operation(&self) -> &OperationDescriptor {
        &self.operation
    }

    #[must_use]
    pub fn request(&self) -> &RequestUrl {
        &self.request
    }

    #[must_use]
    pub fn result(&self) -> &Value {
        &self.result
    }

    #[must_use]
    pub fn into_result(self) -> Value {
        self.result
    }

    #[must_use]
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    /// Whether the result has been replaced by a serialized document.
    #[must_use]
    pub fn is_serialized(&self) -> bool {
        self.serialized
    }

    pub(crate) fn set_jsonapi_content_type(&mut self) {
        self.response_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSONAPI_MEDIA_TYPE),
        );
    }

    /// Replace the raw result with the serialized document.
    ///
    /// Returns `false` (and leaves the result alone) if a document was
    /// already written.
    pub(crate) fn replace_result(&mut self, document: Value) -> bool {
        if self.serialized {
            return false;
        }
        self.result = document;
        self.serialized = true;
        true
    }
}
