//! CMS client accessor.
//!
//! A [`ContentClient`] is built once per process ([`ContentClient::global`])
//! or explicitly from a [`CmsConfig`], and handed to every query. It wraps either a live [`DeliveryClient`] or, when credentials are
//! missing, an [`UnconfiguredSource`] whose reads resolve to empty results.
//! Construction never fails.

mod delivery;
mod unconfigured;

pub use delivery::DeliveryClient;
pub use unconfigured::UnconfiguredSource;

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use coachsite_core::{ContentEntry, EntryCollection};

use crate::config::CmsConfig;
use crate::error::ContentError;

/// Default page size for collection reads.
pub const DEFAULT_LIMIT: u32 = 100;

/// Largest page the delivery API accepts.
pub const MAX_LIMIT: u32 = 1000;

/// Depth of linked resources to include with collection reads.
const INCLUDE_DEPTH: u32 = 2;

/// A read against the entries collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryQuery {
    pub content_type: String,
    pub order: Option<String>,
    pub limit: Option<u32>,
    /// Extra `key=value` filters, e.g. `fields.featured=true`.
    pub filters: Vec<(String, String)>,
}

impl EntryQuery {
    /// Query all entries of a content type.
    #[must_use]
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            order: None,
            limit: None,
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Query-string parameters for the delivery API.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        let mut params = vec![
            ("content_type".to_string(), self.content_type.clone()),
            ("include".to_string(), INCLUDE_DEPTH.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        params.extend(self.filters.iter().cloned());
        params
    }

    /// Stable cache key covering every parameter.
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.to_params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Source of raw CMS entries.
///
/// Implemented by the live delivery client and the unconfigured stub; tests
/// can plug in their own.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch a page of entries.
    async fn get_entries(&self, query: &EntryQuery) -> Result<EntryCollection, ContentError>;

    /// Fetch a single entry by id with its asset links resolved inline.
    /// `Ok(None)` when no such entry exists.
    async fn get_entry(&self, id: &str) -> Result<Option<ContentEntry>, ContentError>;
}

/// Process-wide handle to the CMS.
///
/// Cheap to clone; read-only after construction, so no locking is needed.
#[derive(Clone)]
pub struct ContentClient {
    source: Arc<dyn ContentSource>,
    configured: bool,
}

impl ContentClient {
    /// Build the client from configuration.
    ///
    /// Missing credentials (or a client that cannot be built from them)
    /// produce the unconfigured stub and one diagnostic log line.
    #[must_use]
    pub fn from_config(config: &CmsConfig) -> Self {
        let Some(credentials) = config.credentials() else {
            tracing::warn!(
                preview = config.preview,
                "CMS space id or access token missing, content will be empty"
            );
            return Self::unconfigured();
        };

        match DeliveryClient::new(&config.base_url(), credentials) {
            Ok(client) => {
                tracing::info!(
                    space_id = credentials.space_id,
                    environment = credentials.environment,
                    preview = config.preview,
                    "CMS delivery client initialized"
                );
                Self {
                    source: Arc::new(client),
                    configured: true,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to build CMS delivery client, content will be empty");
                Self::unconfigured()
            }
        }
    }

    /// The process-wide client, built from the environment on first use.
    ///
    /// An invalid configuration value is logged and yields the stub, like
    /// missing credentials. The handle is never rebuilt.
    pub fn global() -> &'static Self {
        static CLIENT: OnceLock<ContentClient> = OnceLock::new();

        CLIENT.get_or_init(|| match CmsConfig::from_env() {
            Ok(config) => Self::from_config(&config),
            Err(e) => {
                tracing::error!(error = %e, "Invalid CMS configuration, content will be empty");
                Self::unconfigured()
            }
        })
    }

    /// Client backed by the empty stub.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            source: Arc::new(UnconfiguredSource),
            configured: false,
        }
    }

    /// Client backed by an arbitrary source.
    #[must_use]
    pub fn with_source(source: impl ContentSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            configured: true,
        }
    }

    /// Whether reads go to a real CMS.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.configured
    }

    /// Fetch a page of entries.
    ///
    /// # Errors
    ///
    /// Propagates the source's error.
    pub async fn get_entries(&self, query: &EntryQuery) -> Result<EntryCollection, ContentError> {
        self.source.get_entries(query).await
    }

    /// Fetch a single entry by id.
    ///
    /// # Errors
    ///
    /// Propagates the source's error.
    pub async fn get_entry(&self, id: &str) -> Result<Option<ContentEntry>, ContentError> {
        self.source.get_entry(id).await
    }
}

impl std::fmt::Debug for ContentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentClient")
            .field("configured", &self.configured)
            .finish_non_exhaustive()
    }
}
