//! Stub source used when the CMS is not configured.

use async_trait::async_trait;
use coachsite_core::{ContentEntry, EntryCollection};

use super::{ContentSource, EntryQuery};
use crate::error::ContentError;

/// Source whose collection reads resolve to the empty collection and whose
/// single-entry reads resolve to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSource;

#[async_trait]
impl ContentSource for UnconfiguredSource {
    async fn get_entries(&self, query: &EntryQuery) -> Result<EntryCollection, ContentError> {
        tracing::debug!(content_type = %query.content_type, "CMS not configured, returning empty collection");
        Ok(EntryCollection::empty())
    }

    async fn get_entry(&self, _id: &str) -> Result<Option<ContentEntry>, ContentError> {
        Ok(None)
    }
}
