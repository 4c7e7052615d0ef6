//! Link construction.
//!
//! Top-level links mirror the inbound URL. Per-record links are rebuilt
//! from scheme, host, API root, type and identity. Link failures never abort
//! a document: a link that cannot be built is `""`.

use std::sync::Arc;

use jsonapi_document::{LinkFn, Record, TopLevelLinks};
use serde_json::Value;
use url::Url;

use crate::context::RequestUrl;
use crate::registry::IDENTITY_KEY;

/// Path segment marking relationship-identifier endpoints.
pub const RELATIONSHIPS_SEGMENT: &str = "relationships";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
enum LinkError {
    #[error("malformed host '{0}'")]
    MalformedHost(String),
    #[error(transparent)]
    Parse(#[from] url::ParseError),
    #[error("url cannot carry a path")]
    CannotBeABase,
}

/// Position of the `relationships` marker in `/…/{type}/{id}/relationships/{name}`.
///
/// The marker must follow at least two non-empty segments and be followed
/// by one, so collections or models that happen to be called
/// `relationships` are not mistaken for identifier endpoints.
fn relationships_segment_index(segments: &[&str]) -> Option<usize> {
    segments.iter().enumerate().position(|(index, segment)| {
        *segment == RELATIONSHIPS_SEGMENT
            && segments[..index].iter().filter(|s| !s.is_empty()).count() >= 2
            && segments.get(index + 1).is_some_and(|next| !next.is_empty())
    })
}

/// Whether `path` (no query) addresses a relationship-identifier endpoint.
#[must_use]
pub fn is_relationship_identifier_path(path: &str) -> bool {
    let segments: Vec<&str> = path.split('/').collect();
    relationships_segment_index(&segments).is_some()
}

/// `path` with the `relationships` marker removed, or `None` if absent.
#[must_use]
pub fn strip_relationships_segment(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = path.split('/').collect();
    let index = relationships_segment_index(&segments)?;
    segments.remove(index);
    Some(segments.join("/"))
}

/// Top-level links for the request: `self` always, `related` only for
/// relationship-identifier endpoints.
#[must_use]
pub fn top_level_links(request: &RequestUrl) -> TopLevelLinks {
    let related = strip_relationships_segment(request.path()).map(|path| {
        format!(
            "{}://{}{}{}",
            request.scheme,
            request.host,
            path,
            request.suffix()
        )
    });

    TopLevelLinks {
        self_link: Some(request.href()),
        related,
    }
}

/// `scheme://host/apiRoot/typeName/identityValue`, or `""` if any piece is
/// unusable.
///
/// `api_root` and `type_name` may span several path segments; only `id` is
/// encoded as a single segment.
#[must_use]
pub fn build_model_url(
    scheme: &str,
    host: &str,
    api_root: &str,
    type_name: &str,
    id: &str,
) -> String {
    match try_build_model_url(scheme, host, api_root, type_name, id) {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(scheme, host, type_name, id, error = %err, "could not build resource link");
            String::new()
        }
    }
}

fn try_build_model_url(
    scheme: &str,
    host: &str,
    api_root: &str,
    type_name: &str,
    id: &str,
) -> Result<String, LinkError> {
    if host.is_empty() || host.contains(['/', '?', '#', '@', ' ']) {
        return Err(LinkError::MalformedHost(host.to_owned()));
    }

    let mut url = Url::parse(&format!("{scheme}://{host}/"))?;
    if url.host_str().is_none() {
        return Err(LinkError::MalformedHost(host.to_owned()));
    }
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| LinkError::CannotBeABase)?;
        segments.clear();
        segments
            .extend(api_root.split('/').filter(|s| !s.is_empty()))
            .extend(type_name.split('/').filter(|s| !s.is_empty()))
            .push(id);
    }
    Ok(url.into())
}

/// Text form of a record's identity for use in a URL (`""` if absent).
fn identity_segment(record: &Record) -> String {
    match record.get(IDENTITY_KEY) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Per-record `self` link generator for resources of `type_name`.
#[must_use]
pub fn record_self_link(request: &RequestUrl, api_root: &str, type_name: &str) -> LinkFn {
    let scheme = request.scheme.clone();
    let host = request.host.clone();
    let api_root = api_root.to_owned();
    let type_name = type_name.to_owned();

    Arc::new(move |record: &Record| {
        build_model_url(&scheme, &host, &api_root, &type_name, &identity_segment(record))
    })
}
