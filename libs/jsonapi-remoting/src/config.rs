//! Pipeline configuration.
//!
//! Loading is lenient: every field has a default, so a host without a
//! `jsonapi` section still gets a working pipeline. Values are layered with
//! `figment` as defaults, then an optional YAML file, then `JSONAPI_*`
//! environment variables.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use jsonapi_document::KeyCase;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prefix for environment overrides, e.g. `JSONAPI_REST_API_ROOT=/v2`.
pub const ENV_PREFIX: &str = "JSONAPI_";

/// Section name used by [`JsonApiConfig::from_figment`].
pub const CONFIG_SECTION: &str = "jsonapi";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonApiConfig {
    /// API root prefixed to per-record links (default: `/api`)
    pub rest_api_root: String,
    /// Operations whose `null` result means "not found" (default: `findById`)
    pub single_record_lookups: Vec<String>,
    /// Casing applied to attribute keys (default: `dash-case`)
    pub key_for_attribute: KeyCase,
}

impl Default for JsonApiConfig {
    fn default() -> Self {
        Self {
            rest_api_root: "/api".to_owned(),
            single_record_lookups: vec!["findById".to_owned()],
            key_for_attribute: KeyCase::default(),
        }
    }
}

impl JsonApiConfig {
    #[must_use]
    pub fn with_rest_api_root(mut self, root: impl Into<String>) -> Self {
        self.rest_api_root = root.into();
        self
    }

    #[must_use]
    pub fn with_single_record_lookups<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.single_record_lookups = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_key_for_attribute(mut self, case: KeyCase) -> Self {
        self.key_for_attribute = case;
        self
    }

    #[must_use]
    pub fn is_single_record_lookup(&self, operation: &str) -> bool {
        self.single_record_lookups.iter().any(|name| name == operation)
    }

    /// Extract the `jsonapi` section of a host figment, or defaults if absent.
    ///
    /// # Errors
    /// Returns `ConfigError` if the section exists but is malformed or invalid.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        if !figment.contains(CONFIG_SECTION) {
            return Ok(Self::default());
        }
        let config: Self = figment.extract_inner(CONFIG_SECTION)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from defaults, an optional YAML file and `JSONAPI_*` env vars.
    ///
    /// # Errors
    /// Returns `ConfigError::FileNotFound` if `path` is given but missing, or
    /// another `ConfigError` if the merged values are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let config: Self = figment.extract()?;
        config.validate()?;
        tracing::debug!(
            rest_api_root = %config.rest_api_root,
            lookups = ?config.single_record_lookups,
            "jsonapi config loaded"
        );
        Ok(config)
    }

    /// # Errors
    /// Returns `ConfigError::InvalidApiRoot` if the API root carries a query
    /// or fragment, and `ConfigError::EmptyLookupName` for blank lookup names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rest_api_root.contains(['?', '#']) || self.rest_api_root.contains("://") {
            return Err(ConfigError::InvalidApiRoot(self.rest_api_root.clone()));
        }
        if self
            .single_record_lookups
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(ConfigError::EmptyLookupName);
        }
        Ok(())
    }
}
