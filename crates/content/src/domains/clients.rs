//! Client logos.

use coachsite_core::{CLIENT, EntryId};
use serde::Serialize;

use super::{ContentDomain, FeaturedDomain, SortOrder};
use crate::cache::CacheTier;
use crate::mapper::FieldReader;

/// A client shown in the logo wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    pub id: EntryId,
    pub name: String,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub featured: bool,
    pub order: i64,
}

/// The `client` content type.
#[derive(Debug, Clone, Copy)]
pub struct Clients;

impl ContentDomain for Clients {
    type Record = Client;

    const NAME: &'static str = "clients";
    const CONTENT_TYPE: &'static str = CLIENT;
    const SORT: SortOrder = SortOrder::Position;
    const CACHE_TIER: CacheTier = CacheTier::Extended;

    fn map_entry(reader: &FieldReader<'_>) -> Client {
        Client {
            id: reader.id(),
            name: reader.text("name"),
            logo: reader.asset_url("logo"),
            website: reader.optional_text("website"),
            featured: reader.flag("featured"),
            order: reader.order(),
        }
    }

    fn position(record: &Client) -> Option<i64> {
        Some(record.order)
    }
}

impl FeaturedDomain for Clients {}
