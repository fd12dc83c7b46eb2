//! Cache for delivery API responses.
//!
//! Two `moka` tiers with different staleness windows: content that changes
//! daily at most (clients, services, team) sits in the extended tier, content
//! that editors touch often (testimonials, posts, events) in the standard one.
//! Only successful reads are cached.

use std::sync::Arc;
use std::time::Duration;

use coachsite_core::{ContentEntry, EntryCollection};
use moka::future::Cache;

const MAX_ENTRIES_PER_TIER: u64 = 1000;

/// Staleness window for a domain's responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    /// 5 minutes
    Standard,
    /// 1 hour
    Extended,
}

impl CacheTier {
    #[must_use]
    pub const fn ttl(self) -> Duration {
        match self {
            Self::Standard => Duration::from_secs(5 * 60),
            Self::Extended => Duration::from_secs(60 * 60),
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Collection(Arc<EntryCollection>),
    Entry(Arc<ContentEntry>),
}

/// Tiered response cache, cheap to clone.
#[derive(Clone)]
pub struct QueryCache {
    standard: Cache<String, CacheValue>,
    extended: Cache<String, CacheValue>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            standard: build_tier(CacheTier::Standard),
            extended: build_tier(CacheTier::Extended),
        }
    }

    const fn tier(&self, tier: CacheTier) -> &Cache<String, CacheValue> {
        match tier {
            CacheTier::Standard => &self.standard,
            CacheTier::Extended => &self.extended,
        }
    }

    pub async fn get(&self, tier: CacheTier, key: &str) -> Option<CacheValue> {
        self.tier(tier).get(key).await
    }

    pub async fn insert(&self, tier: CacheTier, key: String, value: CacheValue) {
        self.tier(tier).insert(key, value).await;
    }

    /// Drop everything in both tiers.
    pub async fn invalidate_all(&self) {
        self.standard.invalidate_all();
        self.extended.invalidate_all();
        self.standard.run_pending_tasks().await;
        self.extended.run_pending_tasks().await;
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("standard_entries", &self.standard.entry_count())
            .field("extended_entries", &self.extended.entry_count())
            .finish()
    }
}

fn build_tier(tier: CacheTier) -> Cache<String, CacheValue> {
    Cache::builder()
        .max_capacity(MAX_ENTRIES_PER_TIER)
        .time_to_live(tier.ttl())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ttls() {
        assert_eq!(CacheTier::Standard.ttl(), Duration::from_secs(300));
        assert_eq!(CacheTier::Extended.ttl(), Duration::from_secs(3600));
    }

    #[tokio::test]
    async fn test_tiers_are_independent() {
        let cache = QueryCache::new();
        cache
            .insert(
                CacheTier::Standard,
                "k".to_string(),
                CacheValue::Collection(Arc::new(EntryCollection::empty())),
            )
            .await;

        assert!(cache.get(CacheTier::Standard, "k").await.is_some());
        assert!(cache.get(CacheTier::Extended, "k").await.is_none());

        cache.invalidate_all().await;
        assert!(cache.get(CacheTier::Standard, "k").await.is_none());
    }
}
