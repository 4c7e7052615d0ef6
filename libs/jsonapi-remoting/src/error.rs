//! Errors surfaced to callers.
//!
//! Only configuration loading can fail outward. Everything that happens
//! while shaping a response degrades to a best-effort value instead.

use std::path::PathBuf;

/// Configuration error for [`JsonApiConfig`](crate::config::JsonApiConfig).
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file '{}' not found", path.display())]
    FileNotFound { path: PathBuf },

    #[error("invalid jsonapi config: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("invalid rest_api_root '{0}': must be a plain path")]
    InvalidApiRoot(String),

    #[error("single_record_lookups must not contain empty operation names")]
    EmptyLookupName,
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract(Box::new(err))
    }
}
