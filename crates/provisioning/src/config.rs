//! Management API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CONTENTFUL_SPACE_ID` - CMS space identifier
//! - `CONTENTFUL_MANAGEMENT_TOKEN` - Content Management API token
//!
//! ## Optional
//! - `CONTENTFUL_ENVIRONMENT` - Environment name (default: master)
//! - `CONTENTFUL_MANAGEMENT_URL` - API base URL (default: <https://api.contentful.com>)
//! - `CONTENTFUL_LOCALE` - Locale used for seeded field values (default: en-US)

use coachsite_core::DEFAULT_LOCALE;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Public management API.
pub const MANAGEMENT_URL: &str = "https://api.contentful.com";

const DEFAULT_ENVIRONMENT: &str = "master";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Management API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ManagementConfig {
    pub space_id: String,
    pub management_token: SecretString,
    pub environment: String,
    pub management_url: Url,
    /// Locale key wrapped around every seeded field value
    pub locale: String,
}

impl std::fmt::Debug for ManagementConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementConfig")
            .field("space_id", &self.space_id)
            .field("management_token", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("management_url", &self.management_url.as_str())
            .field("locale", &self.locale)
            .finish()
    }
}

impl ManagementConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value is
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value is
    /// malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let management_url = get("CONTENTFUL_MANAGEMENT_URL")
            .unwrap_or_else(|| MANAGEMENT_URL.to_string());
        let management_url = Url::parse(&management_url).map_err(|e| {
            ConfigError::InvalidEnvVar("CONTENTFUL_MANAGEMENT_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            space_id: required("CONTENTFUL_SPACE_ID")?,
            management_token: SecretString::from(required("CONTENTFUL_MANAGEMENT_TOKEN")?),
            environment: get("CONTENTFUL_ENVIRONMENT")
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            management_url,
            locale: get("CONTENTFUL_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        })
    }

    /// Base URL for environment-scoped resources.
    #[must_use]
    pub fn environment_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}",
            self.management_url.as_str().trim_end_matches('/'),
            self.space_id,
            self.environment
        )
    }
}
