//! Domain query functions.
//!
//! Every domain gets the same read operations through [`DomainQueries`]:
//!
//! | Operation | Fail-soft | Returns error |
//! |-----------|-----------|---------------|
//! | all entries, naturally sorted | `all` | `try_all` |
//! | entries flagged `featured` | `featured` | `try_featured` |
//! | single entry by id | `by_id` | `try_by_id` |
//! | single entry by slug | `by_slug` | `try_by_slug` |
//!
//! The fail-soft variants are the outer adapter for page rendering: any error
//! is logged, sent to Sentry and replaced by an empty list or `None`. There
//! are no retries.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use coachsite_core::{ContentEntry, DEFAULT_ORDER, EntryCollection};
use tracing::{debug, instrument};

use crate::cache::{CacheTier, CacheValue, QueryCache};
use crate::client::{ContentClient, EntryQuery};
use crate::domains::{
    BlogPosts, Clients, ContentDomain, Events, FeaturedDomain, Results, START_DATE_FIELD,
    Services, SluggedDomain, SortOrder, TeamMembers, Testimonials, WhyChooseUs,
};
use crate::error::{ContentError, report_read_failure};
use crate::mapper::{FieldReader, map_domain};

/// Entry point for all content reads.
///
/// Holds the injected CMS client and the response cache. Cheap to clone.
#[derive(Clone)]
pub struct SiteContent {
    inner: Arc<SiteContentInner>,
}

struct SiteContentInner {
    client: ContentClient,
    cache: Option<QueryCache>,
}

impl SiteContent {
    /// Content reads with response caching.
    #[must_use]
    pub fn new(client: ContentClient) -> Self {
        Self::build(client, Some(QueryCache::new()))
    }

    /// Content reads that always hit the CMS.
    #[must_use]
    pub fn uncached(client: ContentClient) -> Self {
        Self::build(client, None)
    }

    fn build(client: ContentClient, cache: Option<QueryCache>) -> Self {
        Self {
            inner: Arc::new(SiteContentInner { client, cache }),
        }
    }

    #[must_use]
    pub fn client(&self) -> &ContentClient {
        &self.inner.client
    }

    /// Queries for an arbitrary domain.
    #[must_use]
    pub const fn domain<D: ContentDomain>(&self) -> DomainQueries<'_, D> {
        DomainQueries {
            content: self,
            domain: PhantomData,
        }
    }

    #[must_use]
    pub const fn clients(&self) -> DomainQueries<'_, Clients> {
        self.domain()
    }

    #[must_use]
    pub const fn results(&self) -> DomainQueries<'_, Results> {
        self.domain()
    }

    #[must_use]
    pub const fn testimonials(&self) -> DomainQueries<'_, Testimonials> {
        self.domain()
    }

    #[must_use]
    pub const fn why_choose_us(&self) -> DomainQueries<'_, WhyChooseUs> {
        self.domain()
    }

    #[must_use]
    pub const fn services(&self) -> DomainQueries<'_, Services> {
        self.domain()
    }

    #[must_use]
    pub const fn team(&self) -> DomainQueries<'_, TeamMembers> {
        self.domain()
    }

    #[must_use]
    pub const fn blog_posts(&self) -> DomainQueries<'_, BlogPosts> {
        self.domain()
    }

    #[must_use]
    pub const fn events(&self) -> DomainQueries<'_, Events> {
        self.domain()
    }

    /// Invalidate all cached responses.
    pub async fn invalidate_all(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all().await;
        }
    }

    async fn fetch_collection(
        &self,
        query: &EntryQuery,
        tier: CacheTier,
    ) -> Result<Arc<EntryCollection>, ContentError> {
        let cache_key = format!("entries:{}", query.cache_key());

        // Check cache
        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Collection(collection)) = cache.get(tier, &cache_key).await
        {
            debug!("Cache hit for entries");
            return Ok(collection);
        }

        let collection = Arc::new(self.inner.client.get_entries(query).await?);

        // Cache the result
        if let Some(cache) = &self.inner.cache {
            cache
                .insert(tier, cache_key, CacheValue::Collection(Arc::clone(&collection)))
                .await;
        }

        Ok(collection)
    }

    async fn fetch_entry(
        &self,
        id: &str,
        tier: CacheTier,
    ) -> Result<Option<Arc<ContentEntry>>, ContentError> {
        let cache_key = format!("entry:{id}");

        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Entry(entry)) = cache.get(tier, &cache_key).await
        {
            debug!("Cache hit for entry");
            return Ok(Some(entry));
        }

        let Some(entry) = self.inner.client.get_entry(id).await? else {
            return Ok(None);
        };
        let entry = Arc::new(entry);

        if let Some(cache) = &self.inner.cache {
            cache
                .insert(tier, cache_key, CacheValue::Entry(Arc::clone(&entry)))
                .await;
        }

        Ok(Some(entry))
    }
}

impl std::fmt::Debug for SiteContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteContent")
            .field("client", &self.inner.client)
            .field("cached", &self.inner.cache.is_some())
            .finish()
    }
}

/// Read operations for one domain.
#[derive(Debug)]
pub struct DomainQueries<'a, D> {
    content: &'a SiteContent,
    domain: PhantomData<D>,
}

impl<D: ContentDomain> DomainQueries<'_, D> {
    fn base_query() -> EntryQuery {
        EntryQuery::new(D::CONTENT_TYPE).order(D::SORT.param())
    }

    async fn run(&self, query: &EntryQuery) -> Result<Vec<D::Record>, ContentError> {
        let collection = self.content.fetch_collection(query, D::CACHE_TIER).await?;
        let mut records = map_domain::<D>(Some(collection.as_ref()));

        // The CMS may place entries without `order` anywhere; they map to the
        // default position and must still sort last.
        if matches!(D::SORT, SortOrder::Position) {
            records.sort_by_key(|r| D::position(r).unwrap_or(DEFAULT_ORDER));
        }

        Ok(records)
    }

    /// All entries in the domain's natural order.
    ///
    /// # Errors
    ///
    /// Returns the client error; nothing is swallowed.
    #[instrument(skip(self), fields(domain = D::NAME))]
    pub async fn try_all(&self) -> Result<Vec<D::Record>, ContentError> {
        self.run(&Self::base_query()).await
    }

    /// All entries, or an empty list on any failure.
    pub async fn all(&self) -> Vec<D::Record> {
        self.try_all().await.unwrap_or_else(|e| {
            report_read_failure(D::NAME, "all", &e);
            Vec::new()
        })
    }

    /// A single entry by id. `Ok(None)` when it does not exist or belongs to
    /// another content type.
    ///
    /// # Errors
    ///
    /// Returns the client error.
    #[instrument(skip(self), fields(domain = D::NAME, entry_id = %id))]
    pub async fn try_by_id(&self, id: &str) -> Result<Option<D::Record>, ContentError> {
        let Some(entry) = self.content.fetch_entry(id, D::CACHE_TIER).await? else {
            return Ok(None);
        };

        if let Some(content_type) = entry.sys.content_type_id()
            && content_type != D::CONTENT_TYPE
        {
            debug!(content_type, "Entry belongs to another content type");
            return Ok(None);
        }

        Ok(Some(D::map_entry(&FieldReader::new(entry.as_ref(), None))))
    }

    /// A single entry by id, or `None` on not-found or any failure.
    pub async fn by_id(&self, id: &str) -> Option<D::Record> {
        self.try_by_id(id).await.unwrap_or_else(|e| {
            report_read_failure(D::NAME, "by_id", &e);
            None
        })
    }
}

impl<D: FeaturedDomain> DomainQueries<'_, D> {
    /// Entries flagged `featured`, optionally limited.
    ///
    /// A limit of zero returns an empty list without querying the CMS; larger
    /// limits are capped at [`MAX_LIMIT`](crate::client::MAX_LIMIT).
    ///
    /// # Errors
    ///
    /// Returns the client error.
    #[instrument(skip(self), fields(domain = D::NAME))]
    pub async fn try_featured(&self, limit: Option<u32>) -> Result<Vec<D::Record>, ContentError> {
        if limit == Some(0) {
            return Ok(Vec::new());
        }
        let mut query = Self::base_query().filter("fields.featured", "true");
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.run(&query).await
    }

    /// Featured entries, or an empty list on any failure.
    pub async fn featured(&self, limit: Option<u32>) -> Vec<D::Record> {
        self.try_featured(limit).await.unwrap_or_else(|e| {
            report_read_failure(D::NAME, "featured", &e);
            Vec::new()
        })
    }
}

impl<D: SluggedDomain> DomainQueries<'_, D> {
    /// A single entry by slug.
    ///
    /// # Errors
    ///
    /// Returns the client error.
    #[instrument(skip(self), fields(domain = D::NAME, slug = %slug))]
    pub async fn try_by_slug(&self, slug: &str) -> Result<Option<D::Record>, ContentError> {
        let query = Self::base_query().filter("fields.slug", slug).limit(1);
        Ok(self.run(&query).await?.into_iter().next())
    }

    /// A single entry by slug, or `None` on not-found or any failure.
    pub async fn by_slug(&self, slug: &str) -> Option<D::Record> {
        self.try_by_slug(slug).await.unwrap_or_else(|e| {
            report_read_failure(D::NAME, "by_slug", &e);
            None
        })
    }
}

impl DomainQueries<'_, Events> {
    /// Events starting at or after `now`, soonest first.
    ///
    /// # Errors
    ///
    /// Returns the client error.
    #[instrument(skip(self))]
    pub async fn try_upcoming(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<<Events as ContentDomain>::Record>, ContentError> {
        // Minute precision keeps the cache key stable between nearby calls.
        let since = now.format("%Y-%m-%dT%H:%M:00Z").to_string();
        let query = Self::base_query().filter(format!("{START_DATE_FIELD}[gte]"), since);
        self.run(&query).await
    }

    /// Upcoming events, or an empty list on any failure.
    pub async fn upcoming(&self, now: DateTime<Utc>) -> Vec<<Events as ContentDomain>::Record> {
        self.try_upcoming(now).await.unwrap_or_else(|e| {
            report_read_failure(Events::NAME, "upcoming", &e);
            Vec::new()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::client::ContentSource;

    /// Serves a fixed collection and records every query it sees.
    struct FixtureSource {
        collection: EntryCollection,
        queries: Mutex<Vec<EntryQuery>>,
        calls: AtomicUsize,
        failures_left: AtomicUsize,
    }

    impl FixtureSource {
        fn new(collection: serde_json::Value) -> Self {
            Self {
                collection: serde_json::from_value(collection).unwrap(),
                queries: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                failures_left: AtomicUsize::new(0),
            }
        }

        /// Fail the next `count` collection reads, then serve the fixture.
        fn failing_first(self, count: usize) -> Self {
            self.failures_left.store(count, Ordering::SeqCst);
            self
        }
    }

    #[async_trait]
    impl ContentSource for Arc<FixtureSource> {
        async fn get_entries(&self, query: &EntryQuery) -> Result<EntryCollection, ContentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(ContentError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(self.collection.clone())
        }

        async fn get_entry(&self, id: &str) -> Result<Option<ContentEntry>, ContentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .collection
                .clone()
                .into_resolved_items()
                .into_iter()
                .find(|e| e.sys.id.as_str() == id))
        }
    }

    /// Fails every read.
    struct FailingSource;

    #[async_trait]
    impl ContentSource for FailingSource {
        async fn get_entries(&self, _query: &EntryQuery) -> Result<EntryCollection, ContentError> {
            Err(ContentError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }

        async fn get_entry(&self, _id: &str) -> Result<Option<ContentEntry>, ContentError> {
            Err(ContentError::Unauthorized)
        }
    }

    fn client_fixture() -> Arc<FixtureSource> {
        Arc::new(FixtureSource::new(json!({
            "items": [
                {"sys": {"id": "c-none"}, "fields": {"name": "No order"}},
                {"sys": {"id": "c-3"}, "fields": {"name": "Third", "order": 3}},
                {"sys": {"id": "c-1", "contentType": {"sys": {"id": "client"}}},
                 "fields": {"name": "First", "order": 1, "featured": true}}
            ]
        })))
    }

    #[tokio::test]
    async fn test_all_sorts_by_order_with_missing_last() {
        let content = SiteContent::uncached(ContentClient::with_source(client_fixture()));
        let clients = content.clients().all().await;

        let orders: Vec<i64> = clients.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![1, 3, 999]);
        assert!(orders.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_featured_sends_filter_and_limit() {
        let source = client_fixture();
        let content = SiteContent::uncached(ContentClient::with_source(Arc::clone(&source)));
        content.testimonials().featured(Some(3)).await;

        let queries = source.queries.lock().unwrap();
        let params = queries[0].to_params();
        assert!(params.contains(&("content_type".to_string(), "testimonial".to_string())));
        assert!(params.contains(&("fields.featured".to_string(), "true".to_string())));
        assert!(params.contains(&("order".to_string(), "-sys.createdAt".to_string())));
        assert!(params.contains(&("limit".to_string(), "3".to_string())));
    }

    #[tokio::test]
    async fn test_by_id_checks_content_type() {
        let content = SiteContent::uncached(ContentClient::with_source(client_fixture()));

        let client = content.clients().by_id("c-1").await.unwrap();
        assert_eq!(client.name, "First");
        assert!(client.featured);

        assert!(content.services().by_id("c-1").await.is_none());
        assert!(content.clients().by_id("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_failures_degrade_to_empty() {
        let content = SiteContent::uncached(ContentClient::with_source(FailingSource));

        assert!(content.clients().all().await.is_empty());
        assert!(content.testimonials().featured(None).await.is_empty());
        assert!(content.services().by_id("x").await.is_none());
        assert!(content.blog_posts().by_slug("x").await.is_none());
        assert!(content.events().upcoming(Utc::now()).await.is_empty());
    }

    #[tokio::test]
    async fn test_try_variants_keep_the_error() {
        let content = SiteContent::uncached(ContentClient::with_source(FailingSource));

        let err = content.clients().try_all().await.unwrap_err();
        assert!(matches!(err, ContentError::Api { status: 503, .. }));

        let err = content.clients().try_by_id("x").await.unwrap_err();
        assert!(matches!(err, ContentError::Unauthorized));
    }

    #[tokio::test]
    async fn test_unconfigured_client_reads_empty() {
        let content = SiteContent::new(ContentClient::unconfigured());
        assert!(content.clients().all().await.is_empty());
        assert!(content.clients().by_id("abc").await.is_none());
        assert!(content.team().all().await.is_empty());
    }

    #[tokio::test]
    async fn test_cache_serves_repeat_reads() {
        let source = client_fixture();
        let content = SiteContent::new(ContentClient::with_source(Arc::clone(&source)));

        content.clients().all().await;
        content.clients().all().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        // Different query, different key
        content.clients().featured(None).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        content.invalidate_all().await;
        content.clients().all().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let source = Arc::new(
            FixtureSource::new(json!({
                "items": [{"sys": {"id": "a"}, "fields": {"name": "Acme", "order": 1}}]
            }))
            .failing_first(1),
        );
        let content = SiteContent::new(ContentClient::with_source(Arc::clone(&source)));

        assert!(content.clients().try_all().await.is_err());
        let clients = content.clients().try_all().await.unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        content.clients().try_all().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_featured_zero_limit_is_empty_without_request() {
        let source = client_fixture();
        let content = SiteContent::uncached(ContentClient::with_source(Arc::clone(&source)));

        assert!(content.clients().try_featured(Some(0)).await.unwrap().is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upcoming_filters_on_start_date() {
        let source = Arc::new(FixtureSource::new(json!({"items": []})));
        let content = SiteContent::uncached(ContentClient::with_source(Arc::clone(&source)));
        let now = DateTime::parse_from_rfc3339("2025-05-01T12:34:56Z")
            .unwrap()
            .with_timezone(&Utc);

        content.events().upcoming(now).await;

        let queries = source.queries.lock().unwrap();
        let params = queries[0].to_params();
        assert!(params.contains(&(
            "fields.startDate[gte]".to_string(),
            "2025-05-01T12:34:00Z".to_string()
        )));
        assert!(params.contains(&("order".to_string(), "fields.startDate".to_string())));
    }
}
