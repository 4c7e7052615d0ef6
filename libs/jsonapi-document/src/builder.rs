//! Resource serializer
//!
//! [`DocumentBuilder`] is the seam between request handling and document
//! encoding: given a type name, raw JSON data and [`SerializationOptions`] it
//! produces a [`Document`]. [`JsonApiSerializer`] is the default
//! implementation.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_document::{DocumentBuilder, JsonApiSerializer, SerializationOptions};
//! use serde_json::json;
//!
//! let options = SerializationOptions::new().with_attributes(["title"]);
//! let doc = JsonApiSerializer
//!     .build("posts", &json!({"id": 1, "title": "t"}), &options)
//!     .unwrap();
//! assert_eq!(doc.data.len(), 1);
//! ```

use serde_json::{Map, Value};

use crate::document::{Document, PrimaryData, ResourceLinks, ResourceObject};
use crate::options::{Record, SerializationOptions};
use crate::{BuildError, json_kind};

/// Builds JSON:API documents from plain JSON records.
pub trait DocumentBuilder: Send + Sync {
    /// Build a document of `type_name` resources from `data`.
    ///
    /// # Errors
    /// Returns `BuildError::NullData` for `null` data, and other
    /// `BuildError` variants for records the builder cannot represent.
    fn build(
        &self,
        type_name: &str,
        data: &Value,
        options: &SerializationOptions,
    ) -> Result<Document, BuildError>;
}

/// Default serializer: one resource per object, attributes picked from
/// `options.attributes`, links taken from the options.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonApiSerializer;

impl DocumentBuilder for JsonApiSerializer {
    fn build(
        &self,
        type_name: &str,
        data: &Value,
        options: &SerializationOptions,
    ) -> Result<Document, BuildError> {
        let data = match data {
            Value::Null => return Err(BuildError::NullData),
            Value::Object(record) => {
                PrimaryData::Single(Box::new(resource(type_name, record, options, 0)))
            }
            Value::Array(records) => PrimaryData::Many(
                records
                    .iter()
                    .enumerate()
                    .map(|(index, record)| match record {
                        Value::Object(record) => Ok(resource(type_name, record, options, index)),
                        _ => Err(BuildError::RecordNotObject { index }),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            other => return Err(BuildError::UnsupportedData(json_kind(other))),
        };

        Ok(Document {
            data,
            links: options.top_level_links.clone(),
        })
    }
}

fn resource(
    type_name: &str,
    record: &Record,
    options: &SerializationOptions,
    index: usize,
) -> ResourceObject {
    let id = identity_text(record.get(&options.id)).unwrap_or_else(|| {
        tracing::warn!(
            type_name,
            index,
            id_key = %options.id,
            "record has no usable identity"
        );
        String::new()
    });

    let mut attributes = Map::new();
    for key in &options.attributes {
        let Some(value) = record.get(key) else {
            continue;
        };
        let name = options.key_for_attribute.apply(key);
        if *key == options.id || name == options.id {
            continue;
        }
        if attributes.contains_key(&name) {
            tracing::warn!(
                type_name,
                key = %key,
                attribute = %name,
                "attribute key collides after recasing, keeping the first"
            );
            continue;
        }
        attributes.insert(name, value.clone());
    }

    let links = options.data_links.as_ref().map(|self_link| ResourceLinks {
        self_link: self_link(record),
    });

    ResourceObject {
        id,
        type_name: type_name.to_owned(),
        attributes: (!attributes.is_empty()).then_some(attributes),
        links,
    }
}

/// Render an identity value as the string JSON:API requires.
///
/// Scalars use their JSON text; `null` and absent identities have none.
/// Arrays and objects are kept as compact JSON text.
fn identity_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other @ (Value::Number(_) | Value::Bool(_) | Value::Array(_) | Value::Object(_)) => {
            Some(other.to_string())
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::TopLevelLinks;
    use serde_json::json;
    use tracing_test::traced_test;

    fn post_options() -> SerializationOptions {
        SerializationOptions::new()
            .with_attributes(["title", "body"])
            .with_top_level_links(TopLevelLinks {
                self_link: Some("http://host/api/posts/1".to_owned()),
                related: None,
            })
            .with_data_links(|record| {
                format!(
                    "http://host/api/posts/{}",
                    record.get("id").map(ToString::to_string).unwrap_or_default()
                )
            })
    }

    #[test]
    fn single_record_becomes_resource_object() {
        let doc = JsonApiSerializer
            .build(
                "posts",
                &json!({"id": 1, "title": "t", "body": "b"}),
                &post_options(),
            )
            .unwrap();

        assert_eq!(
            doc.to_value().unwrap(),
            json!({
                "data": {
                    "id": "1",
                    "type": "posts",
                    "attributes": {"title": "t", "body": "b"},
                    "links": {"self": "http://host/api/posts/1"}
                },
                "links": {"self": "http://host/api/posts/1"}
            })
        );
    }

    #[test]
    fn collection_keeps_input_order() {
        let data = json!([
            {"id": "b", "title": "second"},
            {"id": "a", "title": "first"}
        ]);
        let doc = JsonApiSerializer
            .build("posts", &data, &post_options())
            .unwrap();

        let ids: Vec<&str> = doc.data.resources().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn null_data_is_rejected() {
        let err = JsonApiSerializer
            .build("posts", &Value::Null, &post_options())
            .unwrap_err();
        assert_eq!(err, BuildError::NullData);
    }

    #[test]
    fn scalar_data_is_rejected() {
        let err = JsonApiSerializer
            .build("posts", &json!(42), &post_options())
            .unwrap_err();
        assert_eq!(err, BuildError::UnsupportedData("number"));
    }

    #[test]
    fn non_object_record_reports_index() {
        let err = JsonApiSerializer
            .build("posts", &json!([{"id": 1}, "oops"]), &post_options())
            .unwrap_err();
        assert_eq!(err, BuildError::RecordNotObject { index: 1 });
    }

    #[test]
    #[traced_test]
    fn missing_identity_degrades_to_empty_id() {
        let doc = JsonApiSerializer
            .build("posts", &json!([{"id": 1}, {"title": "t"}]), &post_options())
            .unwrap();

        let ids: Vec<&str> = doc.data.resources().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", ""]);
        let second = doc.data.resources().nth(1).unwrap();
        assert_eq!(second.attributes, json!({"title": "t"}).as_object().cloned());
        assert!(logs_contain("record has no usable identity"));
    }

    #[test]
    fn null_identity_is_empty() {
        let doc = JsonApiSerializer
            .build("posts", &json!({"id": null, "title": "t"}), &post_options())
            .unwrap();
        assert_eq!(doc.data.resources().next().unwrap().id, "");
    }

    #[test]
    fn structured_identity_is_json_text() {
        let doc = JsonApiSerializer
            .build("posts", &json!({"id": {"a": 1}}), &post_options())
            .unwrap();
        assert_eq!(doc.data.resources().next().unwrap().id, r#"{"a":1}"#);
    }

    #[test]
    fn recased_identity_never_lands_in_attributes() {
        let options = SerializationOptions::new().with_attributes(["id", "_id", "Id", "title"]);
        let doc = JsonApiSerializer
            .build(
                "posts",
                &json!({"id": 1, "_id": "mongo", "Id": "upper", "title": "t"}),
                &options,
            )
            .unwrap();

        let resource = doc.data.resources().next().unwrap();
        assert_eq!(resource.id, "1");
        assert_eq!(resource.attributes, json!({"title": "t"}).as_object().cloned());
    }

    #[test]
    #[traced_test]
    fn colliding_keys_keep_the_first_value() {
        let options = SerializationOptions::new().with_attributes(["postId", "post_id"]);
        let doc = JsonApiSerializer
            .build(
                "comments",
                &json!({"id": 1, "postId": "A", "post_id": "B"}),
                &options,
            )
            .unwrap();

        let attributes = doc.data.resources().next().unwrap().attributes.clone();
        assert_eq!(attributes, json!({"post-id": "A"}).as_object().cloned());
        assert!(logs_contain("attribute key collides after recasing"));
    }

    #[test]
    fn collision_only_counts_present_keys() {
        let options = SerializationOptions::new().with_attributes(["postId", "post_id"]);
        let doc = JsonApiSerializer
            .build("comments", &json!({"id": 1, "post_id": "B"}), &options)
            .unwrap();

        let attributes = doc.data.resources().next().unwrap().attributes.clone();
        assert_eq!(attributes, json!({"post-id": "B"}).as_object().cloned());
    }

    #[test]
    fn identity_never_lands_in_attributes() {
        let options = SerializationOptions::new().with_attributes(["id", "title"]);
        let doc = JsonApiSerializer
            .build("posts", &json!({"id": 3, "title": "t"}), &options)
            .unwrap();

        let resource = doc.data.resources().next().unwrap();
        let attributes = resource.attributes.as_ref().unwrap();
        assert!(!attributes.contains_key("id"));
        assert_eq!(attributes.get("title"), Some(&json!("t")));
    }

    #[test]
    fn unlisted_and_absent_keys_are_skipped() {
        let options = SerializationOptions::new().with_attributes(["title", "missing"]);
        let doc = JsonApiSerializer
            .build(
                "posts",
                &json!({"id": 1, "title": null, "secret": "x"}),
                &options,
            )
            .unwrap();

        let attributes = doc.data.resources().next().unwrap().attributes.clone();
        assert_eq!(attributes, json!({"title": null}).as_object().cloned());
    }

    #[test]
    fn empty_attribute_set_omits_member() {
        let doc = JsonApiSerializer
            .build("posts", &json!({"id": 1, "title": "t"}), &SerializationOptions::new())
            .unwrap();

        let value = doc.to_value().unwrap();
        assert!(value["data"].get("attributes").is_none());
        assert!(value["data"].get("links").is_none());
        assert!(value.get("links").is_none());
    }

    #[test]
    fn attribute_keys_follow_key_case() {
        let options = SerializationOptions::new().with_attributes(["createdAt"]);
        let doc = JsonApiSerializer
            .build("posts", &json!({"id": 1, "createdAt": "2024"}), &options)
            .unwrap();
        let attributes = doc.data.resources().next().unwrap().attributes.clone();
        assert_eq!(attributes, json!({"created-at": "2024"}).as_object().cloned());
    }

    #[test]
    fn custom_identity_member() {
        let mut options = SerializationOptions::new().with_attributes(["title"]);
        options.id = "slug".to_owned();
        let doc = JsonApiSerializer
            .build("posts", &json!({"slug": "hello", "title": "t"}), &options)
            .unwrap();
        assert_eq!(doc.data.resources().next().unwrap().id, "hello");
    }

    #[test]
    fn empty_array_yields_empty_collection() {
        let doc = JsonApiSerializer
            .build("posts", &json!([]), &post_options())
            .unwrap();
        assert_eq!(doc.data, PrimaryData::Many(vec![]));
    }
}
