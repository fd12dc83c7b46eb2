//! "Why choose us" selling points.

use coachsite_core::{EntryId, WHY_CHOOSE_US};
use serde::Serialize;

use super::{ContentDomain, SortOrder};
use crate::cache::CacheTier;
use crate::mapper::FieldReader;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhyChooseUsItem {
    pub id: EntryId,
    pub title: String,
    pub description: String,
    /// URL of the `iconImage` asset.
    pub icon: Option<String>,
    pub order: i64,
}

/// The `whyChooseUs` content type.
#[derive(Debug, Clone, Copy)]
pub struct WhyChooseUs;

impl ContentDomain for WhyChooseUs {
    type Record = WhyChooseUsItem;

    const NAME: &'static str = "why-choose-us";
    const CONTENT_TYPE: &'static str = WHY_CHOOSE_US;
    const SORT: SortOrder = SortOrder::Position;
    const CACHE_TIER: CacheTier = CacheTier::Extended;

    fn map_entry(reader: &FieldReader<'_>) -> WhyChooseUsItem {
        WhyChooseUsItem {
            id: reader.id(),
            title: reader.text("title"),
            description: reader.text("description"),
            icon: reader.asset_url("iconImage"),
            order: reader.order(),
        }
    }

    fn position(record: &WhyChooseUsItem) -> Option<i64> {
        Some(record.order)
    }
}
