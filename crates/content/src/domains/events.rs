//! Workshops and events.

use chrono::{DateTime, Utc};
use coachsite_core::{EVENT, EntryId};
use serde::Serialize;

use super::{ContentDomain, FeaturedDomain, SluggedDomain, SortOrder};
use crate::cache::CacheTier;
use crate::mapper::FieldReader;

/// Field holding the event start, used for ordering and the upcoming filter.
pub const START_DATE_FIELD: &str = "fields.startDate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: EntryId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub registration_url: Option<String>,
    pub featured: bool,
}

/// The `event` content type, soonest first.
#[derive(Debug, Clone, Copy)]
pub struct Events;

impl ContentDomain for Events {
    type Record = Event;

    const NAME: &'static str = "events";
    const CONTENT_TYPE: &'static str = EVENT;
    const SORT: SortOrder = SortOrder::Ascending(START_DATE_FIELD);
    const CACHE_TIER: CacheTier = CacheTier::Standard;

    fn map_entry(reader: &FieldReader<'_>) -> Event {
        Event {
            id: reader.id(),
            title: reader.text("title"),
            slug: reader.text("slug"),
            description: reader.text("description"),
            start_date: reader.date("startDate"),
            end_date: reader.date("endDate"),
            location: reader.optional_text("location"),
            registration_url: reader.optional_text("registrationUrl"),
            featured: reader.flag("featured"),
        }
    }
}

impl FeaturedDomain for Events {}
impl SluggedDomain for Events {}
