//! Document assembly on top of a [`DocumentBuilder`].
//!
//! Builders reject `null`, so "no data" (`null`, `[]`, `{}`) goes in as an
//! empty collection and the resulting `data` is forced back to `null`.

use jsonapi_document::{BuildError, Document, DocumentBuilder, PrimaryData, SerializationOptions};
use serde_json::Value;

/// `null`, an empty array and an empty object all mean "no data".
#[must_use]
pub fn is_empty_data(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// Build the document for `data`, reducing resources to identifiers when
/// `identifier_only` is set.
///
/// # Errors
/// Propagates the builder's `BuildError` for data it cannot represent.
pub fn assemble(
    builder: &dyn DocumentBuilder,
    type_name: &str,
    data: &Value,
    options: &SerializationOptions,
    identifier_only: bool,
) -> Result<Document, BuildError> {
    let mut document = if is_empty_data(data) {
        let mut document = builder.build(type_name, &Value::Array(Vec::new()), options)?;
        document.data = PrimaryData::Null;
        document
    } else {
        builder.build(type_name, data, options)?
    };

    if identifier_only {
        strip_to_identifiers(&mut document);
    }
    Ok(document)
}

/// Drop `attributes` and `links` from every resource object.
pub fn strip_to_identifiers(document: &mut Document) {
    for resource in document.data.resources_mut() {
        resource.strip_to_identifier();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use jsonapi_document::{JsonApiSerializer, TopLevelLinks};
    use serde_json::json;

    fn options() -> SerializationOptions {
        SerializationOptions::new()
            .with_attributes(["body"])
            .with_top_level_links(TopLevelLinks {
                self_link: Some("http://h/api/comments".to_owned()),
                related: None,
            })
            .with_data_links(|_| "http://h/api/comments/x".to_owned())
    }

    #[test]
    fn empty_inputs_become_null_data() {
        for data in [Value::Null, json!([]), json!({})] {
            let document =
                assemble(&JsonApiSerializer, "comments", &data, &options(), false).unwrap();
            assert!(document.data.is_null(), "{data}");
            assert_eq!(
                document.links.self_link.as_deref(),
                Some("http://h/api/comments")
            );
            assert_eq!(document.to_value().unwrap()["data"], Value::Null);
        }
    }

    #[test]
    fn non_empty_input_passes_through() {
        let data = json!([{"id": 1, "body": "a"}, {"id": 2, "body": "b"}]);
        let document = assemble(&JsonApiSerializer, "comments", &data, &options(), false).unwrap();
        assert_eq!(document.data.len(), 2);
        assert!(document.data.resources().all(|r| r.attributes.is_some()));
        assert!(document.data.resources().all(|r| r.links.is_some()));
    }

    #[test]
    fn identifier_only_strips_collections() {
        let data = json!([{"id": 1, "body": "a"}, {"id": 2, "body": "b"}]);
        let document = assemble(&JsonApiSerializer, "comments", &data, &options(), true).unwrap();
        assert_eq!(
            document.to_value().unwrap()["data"],
            json!([{"id": "1", "type": "comments"}, {"id": "2", "type": "comments"}])
        );
    }

    #[test]
    fn identifier_only_strips_single_resource() {
        let data = json!({"id": 9, "body": "a"});
        let document = assemble(&JsonApiSerializer, "users", &data, &options(), true).unwrap();
        assert_eq!(
            document.to_value().unwrap()["data"],
            json!({"id": "9", "type": "users"})
        );
    }

    #[test]
    fn builder_errors_propagate() {
        let err = assemble(&JsonApiSerializer, "comments", &json!("x"), &options(), false)
            .unwrap_err();
        assert_eq!(err, BuildError::UnsupportedData("string"));
    }

    #[test]
    fn scalars_are_not_empty() {
        assert!(!is_empty_data(&json!(0)));
        assert!(!is_empty_data(&json!("")));
        assert!(!is_empty_data(&json!(false)));
    }
}
