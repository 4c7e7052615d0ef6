//! The after-operation pipeline: classify, resolve, link, assemble.

use std::fmt;
use std::sync::Arc;

use jsonapi_document::{DocumentBuilder, JsonApiSerializer, SerializationOptions};

use crate::assembler::assemble;
use crate::classifier::{Classification, SkipReason, classify};
use crate::config::JsonApiConfig;
use crate::context::OperationContext;
use crate::links::{is_relationship_identifier_path, record_self_link, top_level_links};
use crate::naming::{EnglishPluralizer, Pluralizer};
use crate::registry::{IDENTITY_KEY, ModelRegistry};
use crate::resolver::resolve;

/// What the pipeline did with a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Result left as-is on purpose.
    Skipped(SkipReason),
    /// Result replaced with a JSON:API document.
    Serialized,
    /// Shaping failed or had already happened; result left as-is.
    PassedThrough,
}

/// Shapes remote operation results into JSON:API documents.
///
/// Holds only shared, read-only collaborators, so one instance serves all
/// requests concurrently.
#[derive(Clone)]
pub struct JsonApiPipeline {
    registry: Arc<dyn ModelRegistry>,
    builder: Arc<dyn DocumentBuilder>,
    pluralizer: Arc<dyn Pluralizer>,
    config: JsonApiConfig,
}

impl fmt::Debug for JsonApiPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonApiPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JsonApiPipeline {
    #[must_use]
    pub fn new(registry: Arc<dyn ModelRegistry>, config: JsonApiConfig) -> Self {
        Self {
            registry,
            builder: Arc::new(JsonApiSerializer),
            pluralizer: Arc::new(EnglishPluralizer),
            config,
        }
    }

    #[must_use]
    pub fn with_builder(mut self, builder: Arc<dyn DocumentBuilder>) -> Self {
        self.builder = builder;
        self
    }

    #[must_use]
    pub fn with_pluralizer(mut self, pluralizer: Arc<dyn Pluralizer>) -> Self {
        self.pluralizer = pluralizer;
        self
    }

    #[must_use]
    pub fn config(&self) -> &JsonApiConfig {
        &self.config
    }

    /// Run once per completed operation.
    ///
    /// Always sets the JSON:API content type. On [`Outcome::Serialized`] the
    /// context result holds the document; otherwise it is untouched.
    pub fn after_remote(&self, ctx: &mut OperationContext) -> Outcome {
        let span = tracing::debug_span!(
            "jsonapi.serialize",
            model = %ctx.operation().model,
            operation = %ctx.operation().name,
        );
        let _guard = span.enter();

        ctx.set_jsonapi_content_type();

        if ctx.is_serialized() {
            tracing::debug!("result already serialized");
            return Outcome::PassedThrough;
        }

        if let Classification::Skip(reason) = classify(
            ctx.method(),
            &ctx.operation().name,
            ctx.result(),
            &self.config,
        ) {
            tracing::debug!(method = %ctx.method(), ?reason, "skipping");
            return Outcome::Skipped(reason);
        }

        let resolved = resolve(
            ctx.operation(),
            self.registry.as_ref(),
            self.pluralizer.as_ref(),
        );
        let identifier_only = is_relationship_identifier_path(ctx.request().path());
        tracing::debug!(
            type_name = %resolved.type_name,
            attributes = ?resolved.attributes,
            traversal = resolved.is_relationship_traversal,
            identifier_only,
            "resolved resource"
        );

        let mut options = SerializationOptions::new()
            .with_attributes(resolved.attributes)
            .with_top_level_links(top_level_links(ctx.request()))
            .with_key_for_attribute(self.config.key_for_attribute);
        IDENTITY_KEY.clone_into(&mut options.id);
        options.data_links = Some(record_self_link(
            ctx.request(),
            &self.config.rest_api_root,
            &resolved.type_name,
        ));

        let document = match assemble(
            self.builder.as_ref(),
            &resolved.type_name,
            ctx.result(),
            &options,
            identifier_only,
        ) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(error = %err, "document builder failed, passing result through");
                return Outcome::PassedThrough;
            }
        };

        match document.to_value() {
            Ok(value) => {
                if ctx.replace_result(value) {
                    Outcome::Serialized
                } else {
                    Outcome::PassedThrough
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "document encoding failed, passing result through");
                Outcome::PassedThrough
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::context::RequestUrl;
    use crate::operation::OperationDescriptor;
    use crate::registry::{InMemoryModelRegistry, ModelDescriptor};
    use http::{Method, header};
    use jsonapi_document::{BuildError, Document, JSONAPI_MEDIA_TYPE};
    use serde_json::{Value, json};

    fn pipeline() -> JsonApiPipeline {
        let registry = InMemoryModelRegistry::new()
            .with_model(ModelDescriptor::new("post").with_properties(["id", "title"]));
        JsonApiPipeline::new(Arc::new(registry), JsonApiConfig::default())
    }

    fn ctx(method: Method, name: &str, path: &str, result: Value) -> OperationContext {
        OperationContext::new(
            method,
            OperationDescriptor::new("post", name),
            RequestUrl::new("http", "host", path),
            result,
        )
    }

    struct FailingBuilder;

    impl DocumentBuilder for FailingBuilder {
        fn build(
            &self,
            _type_name: &str,
            _data: &Value,
            _options: &SerializationOptions,
        ) -> Result<Document, BuildError> {
            Err(BuildError::UnsupportedData("test"))
        }
    }

    #[test]
    fn serializes_and_sets_content_type() {
        let mut ctx = ctx(Method::GET, "findById", "/api/posts/1", json!({"id": 1, "title": "t"}));
        assert_eq!(pipeline().after_remote(&mut ctx), Outcome::Serialized);
        assert_eq!(
            ctx.response_headers().get(header::CONTENT_TYPE).unwrap(),
            JSONAPI_MEDIA_TYPE
        );
        assert_eq!(ctx.result()["data"]["type"], "posts");
    }

    #[test]
    fn skip_still_sets_content_type() {
        let mut ctx = ctx(Method::HEAD, "findById", "/api/posts/1", json!({"id": 1}));
        assert_eq!(
            pipeline().after_remote(&mut ctx),
            Outcome::Skipped(SkipReason::BodylessMethod)
        );
        assert!(ctx.response_headers().contains_key(header::CONTENT_TYPE));
        assert_eq!(ctx.result(), &json!({"id": 1}));
    }

    #[test]
    fn builder_failure_passes_result_through() {
        let mut ctx = ctx(Method::GET, "find", "/api/posts", json!([{"id": 1}]));
        let pipeline = pipeline().with_builder(Arc::new(FailingBuilder));
        assert_eq!(pipeline.after_remote(&mut ctx), Outcome::PassedThrough);
        assert_eq!(ctx.result(), &json!([{"id": 1}]));
        assert!(!ctx.is_serialized());
    }

    #[test]
    fn second_run_does_not_reserialize() {
        let mut ctx = ctx(Method::GET, "find", "/api/posts", json!([{"id": 1, "title": "t"}]));
        let pipeline = pipeline();
        assert_eq!(pipeline.after_remote(&mut ctx), Outcome::Serialized);
        let first = ctx.result().clone();
        assert_eq!(pipeline.after_remote(&mut ctx), Outcome::PassedThrough);
        assert_eq!(ctx.result(), &first);
    }

    #[test]
    fn custom_pluralizer_is_used() {
        struct Upper;
        impl Pluralizer for Upper {
            fn pluralize(&self, word: &str) -> String {
                format!("{}S", word.to_uppercase())
            }
        }

        let mut ctx = ctx(Method::GET, "find", "/api/posts", json!([{"id": 1}]));
        let pipeline = pipeline().with_pluralizer(Arc::new(Upper));
        assert_eq!(pipeline.after_remote(&mut ctx), Outcome::Serialized);
        assert_eq!(ctx.result()["data"][0]["type"], "POSTS");
    }
}
