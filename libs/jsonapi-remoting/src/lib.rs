#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! JSON:API response shaping for remote operations.
//!
//! After each remote operation the host hands an [`OperationContext`] to
//! [`JsonApiPipeline::after_remote`], which runs four phases in order:
//!
//! 1. [`classifier`]: skip bodyless methods and not-found lookups
//! 2. [`resolver`]: pick the JSON:API type and attribute keys, following
//!    relationship traversals to the related model
//! 3. [`links`]: rebuild top-level and per-record links from the request
//! 4. [`assembler`]: build the document and reduce it to resource
//!    identifiers on `/relationships/` endpoints
//!
//! Nothing in the pipeline fails outward. Registry misses, unusable URLs and
//! builder errors all degrade to a best-effort response.
pub mod assembler;
pub mod classifier;
pub mod config;
pub mod context;
pub mod error;
pub mod links;
#[cfg(feature = "axum")]
pub mod middleware;
pub mod naming;
pub mod operation;
pub mod pipeline;
pub mod registry;
pub mod resolver;

pub use classifier::{Classification, SkipReason};
pub use config::JsonApiConfig;
pub use context::{OperationContext, RequestUrl};
pub use error::ConfigError;
pub use naming::{EnglishPluralizer, Pluralizer};
pub use operation::{OperationDescriptor, RelationshipAccessor};
pub use pipeline::{JsonApiPipeline, Outcome};
pub use registry::{InMemoryModelRegistry, ModelDescriptor, ModelRegistry};

pub use jsonapi_document::JSONAPI_MEDIA_TYPE;
