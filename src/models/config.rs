//! Adapter configuration loaded from external sources.
//!
//! Credentials and options come from `SF_*` environment variables, with an
//! optional local settings file underneath (the file a deployment generates
//! next to the application). Environment always wins over the file.

use std::env;

use serde::Deserialize;

use crate::DEFAULT_API_VERSION;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Token endpoint host used when `SF_HOST` is not set.
pub const DEFAULT_HOST: &str = "https://login.salesforce.com";

/// Environment variable carrying the license key required for the
/// lowercase primary-key option.
pub const LICENSE_KEY_VAR: &str = "DJSF_LICENSE_KEY";

#[derive(Clone, Debug, Deserialize)]
/// Connected-app credentials plus adapter options.
pub struct AdapterConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub user: String,
    pub password: String,
    pub host: String,
    /// Primary-key field name exposed on mapped models, `Id` or `id`.
    pub pk: String,
    /// Defer authentication until the first request.
    pub lazy_connect: bool,
    pub api_version: String,
}

impl AdapterConfig {
    /// Load configuration from the optional settings file overlaid by
    /// `SF_*` environment variables.
    pub fn load(settings_file: Option<&str>) -> RepositoryResult<Self> {
        let mut builder = config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("pk", "Id")?
            .set_default("lazy_connect", false)?
            .set_default("api_version", DEFAULT_API_VERSION)?;

        if let Some(path) = settings_file {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("SF").try_parsing(true))
            .build()?;

        let config: AdapterConfig = settings.try_deserialize()?;
        config.validate(license_key().as_deref())?;
        Ok(config)
    }

    /// Load configuration from the environment only.
    pub fn from_env() -> RepositoryResult<Self> {
        Self::load(None)
    }

    fn validate(&self, license_key: Option<&str>) -> RepositoryResult<()> {
        match self.pk.as_str() {
            "Id" => Ok(()),
            "id" if license_key.is_some() => Ok(()),
            "id" => Err(RepositoryError::Validation(format!(
                "pk = \"id\" is a licensed option; set {LICENSE_KEY_VAR}"
            ))),
            other => Err(RepositoryError::Validation(format!(
                "unsupported pk field name {other:?} (expected \"Id\" or \"id\")"
            ))),
        }
    }
}

/// License key from the environment, if any.
pub fn license_key() -> Option<String> {
    env::var(LICENSE_KEY_VAR).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pk: &str) -> AdapterConfig {
        AdapterConfig {
            consumer_key: "key".to_string(),
            consumer_secret: "secret".to_string(),
            user: "user@example.com".to_string(),
            password: "hunter2".to_string(),
            host: DEFAULT_HOST.to_string(),
            pk: pk.to_string(),
            lazy_connect: false,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    #[test]
    fn default_pk_needs_no_license() {
        assert!(sample("Id").validate(None).is_ok());
    }

    #[test]
    fn lowercase_pk_requires_license_key() {
        assert!(matches!(
            sample("id").validate(None),
            Err(RepositoryError::Validation(_))
        ));
        assert!(sample("id").validate(Some("licensed")).is_ok());
    }

    #[test]
    fn other_pk_names_are_rejected() {
        assert!(matches!(
            sample("pk").validate(Some("licensed")),
            Err(RepositoryError::Validation(_))
        ));
    }
}
