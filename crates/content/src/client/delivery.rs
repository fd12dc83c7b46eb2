//! Content Delivery API client.
//!
//! Plain REST over `reqwest`: `GET /spaces/{space}/environments/{env}/entries`
//! with a bearer token. No retries; a 429 surfaces as
//! [`ContentError::RateLimited`].

use std::sync::Arc;

use async_trait::async_trait;
use coachsite_core::{ContentEntry, EntryCollection};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use super::{ContentSource, EntryQuery};
use crate::config::DeliveryCredentials;
use crate::error::ContentError;

/// Client for the CMS Content Delivery (or Preview) API.
#[derive(Clone)]
pub struct DeliveryClient {
    inner: Arc<DeliveryClientInner>,
}

struct DeliveryClientInner {
    client: reqwest::Client,
    entries_url: String,
    space_id: String,
    environment: String,
}

impl DeliveryClient {
    /// Create a new delivery client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(base_url: &str, credentials: DeliveryCredentials<'_>) -> Result<Self, ContentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", credentials.token.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ContentError::InvalidConfig(format!("Invalid access token format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let entries_url = format!(
            "{}/spaces/{}/environments/{}/entries",
            base_url.trim_end_matches('/'),
            credentials.space_id,
            credentials.environment
        );

        Ok(Self {
            inner: Arc::new(DeliveryClientInner {
                client,
                entries_url,
                space_id: credentials.space_id.to_string(),
                environment: credentials.environment.to_string(),
            }),
        })
    }

    async fn fetch_collection(
        &self,
        params: &[(String, String)],
    ) -> Result<EntryCollection, ContentError> {
        let response = self
            .inner
            .client
            .get(&self.inner.entries_url)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(parse_error(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse CMS entries response"
            );
            ContentError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl ContentSource for DeliveryClient {
    #[instrument(skip(self, query), fields(content_type = %query.content_type))]
    async fn get_entries(&self, query: &EntryQuery) -> Result<EntryCollection, ContentError> {
        let collection = self.fetch_collection(&query.to_params()).await?;
        debug!(
            items = collection.items.len(),
            total = collection.total,
            "Fetched entries"
        );
        Ok(collection)
    }

    // The single-entry endpoint does not return includes, so go through the
    // collection endpoint to get linked assets in the same round trip.
    #[instrument(skip(self), fields(entry_id = %id))]
    async fn get_entry(&self, id: &str) -> Result<Option<ContentEntry>, ContentError> {
        let params = [
            ("sys.id".to_string(), id.to_string()),
            ("include".to_string(), "2".to_string()),
            ("limit".to_string(), "1".to_string()),
        ];
        let collection = self.fetch_collection(&params).await?;
        Ok(collection.into_resolved_items().into_iter().next())
    }
}

/// Map a non-success response to an error.
async fn parse_error(response: reqwest::Response) -> ContentError {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after = response
            .headers()
            .get("X-Contentful-RateLimit-Reset")
            .or_else(|| response.headers().get("Retry-After"))
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        return ContentError::RateLimited(retry_after);
    }

    if status == 401 || status == 403 {
        return ContentError::Unauthorized;
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    if status == 404 {
        return ContentError::NotFound(message.chars().take(200).collect());
    }

    ContentError::Api { status, message }
}

impl std::fmt::Debug for DeliveryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryClient")
            .field("space_id", &self.inner.space_id)
            .field("environment", &self.inner.environment)
            .finish_non_exhaustive()
    }
}
