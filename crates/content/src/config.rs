//! CMS read configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional. Without a space id and a token the site still renders, with
//! empty content (see [`crate::client::ContentClient::from_config`]).
//!
//! - `CONTENTFUL_SPACE_ID` - CMS space identifier
//! - `CONTENTFUL_ACCESS_TOKEN` - Content Delivery API token
//! - `CONTENTFUL_PREVIEW_ACCESS_TOKEN` - Content Preview API token
//! - `CONTENTFUL_ENVIRONMENT` - Environment name (default: master)
//! - `CONTENTFUL_PREVIEW` - Read drafts through the preview API (default: false)
//! - `CONTENTFUL_DELIVERY_URL` - Override the API base URL

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Public delivery API.
pub const DELIVERY_URL: &str = "https://cdn.contentful.com";

/// Preview API (unpublished drafts).
pub const PREVIEW_URL: &str = "https://preview.contentful.com";

const DEFAULT_ENVIRONMENT: &str = "master";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CMS read configuration.
///
/// Implements `Debug` manually to redact tokens.
#[derive(Clone)]
pub struct CmsConfig {
    /// Space identifier
    pub space_id: Option<String>,
    /// Delivery API access token
    pub access_token: Option<SecretString>,
    /// Preview API access token
    pub preview_access_token: Option<SecretString>,
    /// Environment name (e.g., master, staging)
    pub environment: String,
    /// Whether to read drafts through the preview API
    pub preview: bool,
    /// Base URL override
    pub delivery_url: Option<Url>,
}

impl std::fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsConfig")
            .field("space_id", &self.space_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "preview_access_token",
                &self.preview_access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("environment", &self.environment)
            .field("preview", &self.preview)
            .field("delivery_url", &self.delivery_url)
            .finish()
    }
}

/// Everything needed to build a live delivery client.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryCredentials<'a> {
    pub space_id: &'a str,
    pub token: &'a SecretString,
    pub environment: &'a str,
}

impl CmsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed. Missing
    /// credentials are not an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for an unparsable preview flag or
    /// delivery URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let preview = match get("CONTENTFUL_PREVIEW") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "CONTENTFUL_PREVIEW".to_string(),
                    format!("expected true/false, got '{raw}'"),
                )
            })?,
            None => false,
        };

        let delivery_url = get("CONTENTFUL_DELIVERY_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("CONTENTFUL_DELIVERY_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            space_id: get("CONTENTFUL_SPACE_ID"),
            access_token: get("CONTENTFUL_ACCESS_TOKEN").map(SecretString::from),
            preview_access_token: get("CONTENTFUL_PREVIEW_ACCESS_TOKEN").map(SecretString::from),
            environment: get("CONTENTFUL_ENVIRONMENT")
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            preview,
            delivery_url,
        })
    }

    /// Credentials for the configured API, or `None` when the space id or the
    /// token for the selected API is missing.
    #[must_use]
    pub fn credentials(&self) -> Option<DeliveryCredentials<'_>> {
        let token = if self.preview {
            self.preview_access_token.as_ref()?
        } else {
            self.access_token.as_ref()?
        };

        Some(DeliveryCredentials {
            space_id: self.space_id.as_deref()?,
            token,
            environment: &self.environment,
        })
    }

    /// Base URL of the API this configuration reads from.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.delivery_url.as_ref().map_or_else(
            || {
                if self.preview {
                    PREVIEW_URL.to_string()
                } else {
                    DELIVERY_URL.to_string()
                }
            },
            |url| url.as_str().trim_end_matches('/').to_string(),
        )
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
