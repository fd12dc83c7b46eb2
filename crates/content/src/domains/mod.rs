//! Content domains.
//!
//! Each domain pairs a CMS content type with a record shape, a mapping from
//! raw fields and a natural sort order. Queries are written once against
//! [`ContentDomain`] (see [`crate::queries`]).

mod blog;
mod clients;
mod events;
mod results;
mod services;
mod team;
mod testimonials;
mod why_choose_us;

pub use blog::{BlogPost, BlogPosts};
pub use clients::{Client, Clients};
pub use events::{Event, Events, START_DATE_FIELD};
pub use results::{ClientResult, Results};
pub use services::{Service, Services};
pub use team::{TeamMember, TeamMembers};
pub use testimonials::{Testimonial, Testimonials};
pub use why_choose_us::{WhyChooseUs, WhyChooseUsItem};

use serde::Serialize;

use crate::cache::CacheTier;
use crate::mapper::FieldReader;

/// Natural ordering of a domain's entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// `order` ascending; records are also re-sorted locally after mapping.
    Position,
    /// Newest first by creation time.
    NewestFirst,
    /// A field ascending, e.g. `fields.startDate`.
    Ascending(&'static str),
    /// A field descending.
    Descending(&'static str),
}

impl SortOrder {
    /// Value of the delivery API `order` parameter.
    #[must_use]
    pub fn param(self) -> String {
        match self {
            Self::Position => "fields.order".to_string(),
            Self::NewestFirst => "-sys.createdAt".to_string(),
            Self::Ascending(field) => field.to_string(),
            Self::Descending(field) => format!("-{field}"),
        }
    }
}

/// A content type and how to read it.
pub trait ContentDomain: Send + Sync + 'static {
    /// Record produced for each entry.
    type Record: Clone + std::fmt::Debug + Serialize + Send + Sync + 'static;

    /// Short name used in logs and the CLI, e.g. `clients`.
    const NAME: &'static str;

    /// CMS content-type id.
    const CONTENT_TYPE: &'static str;

    const SORT: SortOrder;

    const CACHE_TIER: CacheTier;

    /// Build a record from one entry. Must not fail.
    fn map_entry(reader: &FieldReader<'_>) -> Self::Record;

    /// Sort position for [`SortOrder::Position`] domains.
    fn position(_record: &Self::Record) -> Option<i64> {
        None
    }
}

/// Domains whose entries carry a boolean `featured` field.
pub trait FeaturedDomain: ContentDomain {}

/// Domains whose entries carry a unique `slug` field.
pub trait SluggedDomain: ContentDomain {}
