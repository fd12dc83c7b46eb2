//! HTTP implementation of [`ManagementApi`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::{
    ContentTypeDefinition, EditorInterface, EntryFields, EntryResponse, ManagementApi, NewEntry,
    ResourceSys,
};
use crate::config::ManagementConfig;
use crate::error::ManagementError;

const MANAGEMENT_CONTENT_TYPE: &str = "application/vnd.contentful.management.v1+json";
const VERSION_HEADER: &str = "X-Contentful-Version";
const CONTENT_TYPE_HEADER: &str = "X-Contentful-Content-Type";

/// Error body returned by the management API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    sys: ApiErrorSys,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorSys {
    id: String,
}

/// Management API client.
#[derive(Clone)]
pub struct ManagementClient {
    inner: Arc<ManagementClientInner>,
}

struct ManagementClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ManagementClient {
    /// Create a new management API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ManagementConfig) -> Result<Self, ManagementError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.management_token.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ManagementError::InvalidHeader(format!("Invalid management token format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ManagementClientInner {
                client,
                base_url: config.environment_url(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ManagementError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        handle_response(response).await
    }

    /// PUT with an optional JSON body and version header.
    async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
        version: Option<u64>,
    ) -> Result<T, ManagementError> {
        let mut request = self
            .inner
            .client
            .put(self.url(path))
            .header(CONTENT_TYPE, MANAGEMENT_CONTENT_TYPE);

        if let Some(version) = version {
            request = request.header(VERSION_HEADER, version);
        }
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ManagementError::Parse(format!("Failed to encode request: {e}")))?;
            request = request.body(bytes);
        }

        let response = request.send().await?;
        handle_response(response).await
    }
}

#[async_trait]
impl ManagementApi for ManagementClient {
    #[instrument(skip(self))]
    async fn get_content_type(&self, id: &str) -> Result<ContentTypeDefinition, ManagementError> {
        self.get(&format!("/content_types/{id}")).await
    }

    #[instrument(skip(self, definition), fields(fields = definition.fields.len()))]
    async fn put_content_type(
        &self,
        id: &str,
        definition: &ContentTypeDefinition,
        version: Option<u64>,
    ) -> Result<ContentTypeDefinition, ManagementError> {
        let saved: ContentTypeDefinition = self
            .put(&format!("/content_types/{id}"), Some(definition), version)
            .await?;
        debug!(version = saved.sys.version, "Content type saved");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn activate_content_type(
        &self,
        id: &str,
        version: u64,
    ) -> Result<ContentTypeDefinition, ManagementError> {
        self.put::<_, ()>(&format!("/content_types/{id}/published"), None, Some(version))
            .await
    }

    #[instrument(skip(self))]
    async fn get_editor_interface(
        &self,
        content_type_id: &str,
    ) -> Result<EditorInterface, ManagementError> {
        self.get(&format!("/content_types/{content_type_id}/editor_interface"))
            .await
    }

    #[instrument(skip(self, interface), fields(version = interface.sys.version))]
    async fn put_editor_interface(
        &self,
        content_type_id: &str,
        interface: &EditorInterface,
    ) -> Result<EditorInterface, ManagementError> {
        self.put(
            &format!("/content_types/{content_type_id}/editor_interface"),
            Some(interface),
            Some(interface.sys.version),
        )
        .await
    }

    #[instrument(skip(self, fields))]
    async fn create_entry(
        &self,
        content_type_id: &str,
        fields: &EntryFields,
    ) -> Result<ResourceSys, ManagementError> {
        let content_type = HeaderValue::from_str(content_type_id)
            .map_err(|e| ManagementError::InvalidHeader(format!("Invalid content type id: {e}")))?;
        let body = serde_json::to_vec(&NewEntry { fields })
            .map_err(|e| ManagementError::Parse(format!("Failed to encode request: {e}")))?;

        let response = self
            .inner
            .client
            .post(self.url("/entries"))
            .header(CONTENT_TYPE, MANAGEMENT_CONTENT_TYPE)
            .header(CONTENT_TYPE_HEADER, content_type)
            .body(body)
            .send()
            .await?;

        let entry: EntryResponse = handle_response(response).await?;
        debug!(entry_id = %entry.sys.id, "Entry created");
        Ok(entry.sys)
    }

    #[instrument(skip(self))]
    async fn publish_entry(&self, id: &str, version: u64) -> Result<ResourceSys, ManagementError> {
        let entry: EntryResponse = self
            .put::<_, ()>(&format!("/entries/{id}/published"), None, Some(version))
            .await?;
        Ok(entry.sys)
    }
}

/// Handle API response and parse JSON.
async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ManagementError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        return serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse management API response"
            );
            ManagementError::Parse(e.to_string())
        });
    }

    Err(parse_error(response).await)
}

/// Parse error response from the management API.
async fn parse_error(response: reqwest::Response) -> ManagementError {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after = response
            .headers()
            .get("X-Contentful-RateLimit-Reset")
            .or_else(|| response.headers().get("Retry-After"))
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        return ManagementError::RateLimited(retry_after);
    }

    if status == 401 || status == 403 {
        return ManagementError::Unauthorized;
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(error) if error.message.is_empty() => error.sys.id,
        Ok(error) => format!("{}: {}", error.sys.id, error.message),
        Err(_) => body.chars().take(200).collect(),
    };

    match status {
        404 => ManagementError::NotFound(message),
        409 | 422 => ManagementError::Conflict(message),
        _ => ManagementError::Api { status, message },
    }
}

impl std::fmt::Debug for ManagementClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
