//! Testimonials.

use chrono::{DateTime, Utc};
use coachsite_core::{EntryId, TESTIMONIAL};
use serde::Serialize;

use super::{ContentDomain, FeaturedDomain, SortOrder};
use crate::cache::CacheTier;
use crate::mapper::FieldReader;

/// A client quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Testimonial {
    pub id: EntryId,
    pub quote: String,
    pub author_name: String,
    pub author_title: Option<String>,
    pub company: Option<String>,
    pub avatar: Option<String>,
    /// Star rating, only kept when within 1..=5.
    pub rating: Option<u8>,
    pub featured: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// The `testimonial` content type, newest first.
#[derive(Debug, Clone, Copy)]
pub struct Testimonials;

impl ContentDomain for Testimonials {
    type Record = Testimonial;

    const NAME: &'static str = "testimonials";
    const CONTENT_TYPE: &'static str = TESTIMONIAL;
    const SORT: SortOrder = SortOrder::NewestFirst;
    const CACHE_TIER: CacheTier = CacheTier::Standard;

    fn map_entry(reader: &FieldReader<'_>) -> Testimonial {
        Testimonial {
            id: reader.id(),
            quote: reader.text("quote"),
            author_name: reader.text("authorName"),
            author_title: reader.optional_text("authorTitle"),
            company: reader.optional_text("company"),
            avatar: reader.asset_url("avatar"),
            rating: reader
                .integer("rating")
                .and_then(|r| u8::try_from(r).ok())
                .filter(|r| (1..=5).contains(r)),
            featured: reader.flag("featured"),
            created_at: reader.created_at(),
        }
    }
}

impl FeaturedDomain for Testimonials {}
