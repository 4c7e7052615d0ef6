//! Axum host integration.
//!
//! Handlers tag their responses with a [`RemoteOperation`] extension; the
//! middleware then runs every tagged response through the pipeline, the way
//! a host would after each remote operation. Untagged responses are not
//! touched.
//!
//! ```ignore
//! let pipeline = Arc::new(JsonApiPipeline::new(registry, config));
//! let app = Router::new()
//!     .route("/api/posts/{id}", get(find_post))
//!     .layer(axum::middleware::from_fn_with_state(pipeline, jsonapi_middleware));
//!
//! async fn find_post(Path(id): Path<u64>) -> Response {
//!     RemoteOperation::new(OperationDescriptor::new("post", "findById"))
//!         .attach(Json(load_post(id)))
//! }
//! ```

use std::sync::Arc;

use axum::body::{Body, Bytes, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header, response::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonapi_document::JSONAPI_MEDIA_TYPE;
use serde_json::{Value, json};

use crate::classifier::SkipReason;
use crate::context::{OperationContext, RequestUrl};
use crate::operation::OperationDescriptor;
use crate::pipeline::{JsonApiPipeline, Outcome};

/// Upper bound on buffered response bodies.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Response extension naming the operation that produced the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOperation(pub OperationDescriptor);

impl RemoteOperation {
    #[must_use]
    pub fn new(operation: OperationDescriptor) -> Self {
        Self(operation)
    }

    /// Convert `response` and tag it with this operation.
    #[must_use]
    pub fn attach(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Scheme and host as the client saw them.
fn request_url(req: &Request) -> RequestUrl {
    let headers = req.headers();
    let scheme = header_text(headers, FORWARDED_PROTO)
        .and_then(|proto| proto.split(',').next())
        .map(str::trim)
        .filter(|proto| !proto.is_empty())
        .or_else(|| req.uri().scheme_str())
        .unwrap_or("http")
        .to_owned();
    let host = header_text(headers, header::HOST.as_str())
        .or_else(|| req.uri().authority().map(axum::http::uri::Authority::as_str))
        .unwrap_or_default()
        .to_owned();

    RequestUrl::from_uri(scheme, host, req.uri())
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn set_jsonapi_content_type(parts: &mut Parts) {
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSONAPI_MEDIA_TYPE),
    );
}

fn not_found(mut parts: Parts) -> Response {
    parts.status = StatusCode::NOT_FOUND;
    parts.headers.remove(header::CONTENT_LENGTH);
    let body = json!({"errors": [{"status": "404", "title": "Not Found"}]});
    Response::from_parts(parts, Body::from(body.to_string()))
}

fn replace_body(mut parts: Parts, body: Vec<u8>) -> Response {
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(body))
}

/// Middleware shaping tagged responses into JSON:API documents.
pub async fn jsonapi_middleware(
    State(pipeline): State<Arc<JsonApiPipeline>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let request = request_url(&req);

    let mut response = next.run(req).await;
    let Some(RemoteOperation(operation)) = response.extensions_mut().remove::<RemoteOperation>()
    else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let bytes: Bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "failed to buffer response body");
            set_jsonapi_content_type(&mut parts);
            parts.status = StatusCode::INTERNAL_SERVER_ERROR;
            let body = json!({"errors": [{"status": "500", "title": "Internal Server Error"}]});
            return replace_body(parts, body.to_string().into_bytes());
        }
    };

    let result = if bytes.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "response body is not JSON, passing through");
                set_jsonapi_content_type(&mut parts);
                return Response::from_parts(parts, Body::from(bytes));
            }
        }
    };

    let mut ctx = OperationContext::new(method, operation, request, result);
    let outcome = pipeline.after_remote(&mut ctx);
    for (name, value) in ctx.response_headers() {
        parts.headers.insert(name.clone(), value.clone());
    }

    match outcome {
        Outcome::Skipped(SkipReason::NotFound) => not_found(parts),
        Outcome::Serialized => match serde_json::to_vec(ctx.result()) {
            Ok(body) => replace_body(parts, body),
            Err(err) => {
                tracing::warn!(error = %err, "could not encode document, passing through");
                Response::from_parts(parts, Body::from(bytes))
            }
        },
        Outcome::Skipped(SkipReason::BodylessMethod) | Outcome::PassedThrough => {
            Response::from_parts(parts, Body::from(bytes))
        }
    }
}
