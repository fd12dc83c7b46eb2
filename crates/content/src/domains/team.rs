//! Team members.

use coachsite_core::{EntryId, TEAM_MEMBER};
use serde::Serialize;

use super::{ContentDomain, SortOrder};
use crate::cache::CacheTier;
use crate::mapper::FieldReader;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    pub id: EntryId,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub photo: Option<String>,
    pub linkedin_url: Option<String>,
    pub order: i64,
}

/// The `teamMember` content type.
#[derive(Debug, Clone, Copy)]
pub struct TeamMembers;

impl ContentDomain for TeamMembers {
    type Record = TeamMember;

    const NAME: &'static str = "team";
    const CONTENT_TYPE: &'static str = TEAM_MEMBER;
    const SORT: SortOrder = SortOrder::Position;
    const CACHE_TIER: CacheTier = CacheTier::Extended;

    fn map_entry(reader: &FieldReader<'_>) -> TeamMember {
        TeamMember {
            id: reader.id(),
            name: reader.text("name"),
            role: reader.text("role"),
            bio: reader.text("bio"),
            photo: reader.asset_url("photo"),
            linkedin_url: reader.optional_text("linkedinUrl"),
            order: reader.order(),
        }
    }

    fn position(record: &TeamMember) -> Option<i64> {
        Some(record.order)
    }
}
