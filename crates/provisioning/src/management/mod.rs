//! Content Management API access.
//!
//! Migrations and seeders talk to the CMS through [`ManagementApi`]. The live
//! implementation is [`ManagementClient`]; unit tests use an in-memory fake.
//!
//! # API Reference
//!
//! - Base URL: `https://api.contentful.com/spaces/{space}/environments/{env}`
//! - Authentication: `Authorization: Bearer <management token>`
//! - Writes carry `X-Contentful-Version` for optimistic locking

mod client;
#[cfg(test)]
pub(crate) mod fake;
mod types;

pub use client::ManagementClient;
pub use types::*;

use async_trait::async_trait;

use crate::error::ManagementError;

/// Schema and entry writes against one CMS environment.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Fetch a content type. A missing type is [`ManagementError::NotFound`].
    async fn get_content_type(&self, id: &str) -> Result<ContentTypeDefinition, ManagementError>;

    /// Create (`version: None`) or update a content type.
    ///
    /// Creating a type that already exists is [`ManagementError::Conflict`].
    async fn put_content_type(
        &self,
        id: &str,
        definition: &ContentTypeDefinition,
        version: Option<u64>,
    ) -> Result<ContentTypeDefinition, ManagementError>;

    /// Publish (activate) a content type at `version`.
    async fn activate_content_type(
        &self,
        id: &str,
        version: u64,
    ) -> Result<ContentTypeDefinition, ManagementError>;

    async fn get_editor_interface(
        &self,
        content_type_id: &str,
    ) -> Result<EditorInterface, ManagementError>;

    /// Save an editor interface at `interface.sys.version`.
    async fn put_editor_interface(
        &self,
        content_type_id: &str,
        interface: &EditorInterface,
    ) -> Result<EditorInterface, ManagementError>;

    /// Create a draft entry; returns its id and version.
    async fn create_entry(
        &self,
        content_type_id: &str,
        fields: &EntryFields,
    ) -> Result<ResourceSys, ManagementError>;

    async fn publish_entry(&self, id: &str, version: u64) -> Result<ResourceSys, ManagementError>;
}
