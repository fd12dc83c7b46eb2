//! Coaching services.

use coachsite_core::{EntryId, SERVICE};
use serde::Serialize;

use super::{ContentDomain, FeaturedDomain, SluggedDomain, SortOrder};
use crate::cache::CacheTier;
use crate::mapper::FieldReader;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: EntryId,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub description: String,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
    pub order: i64,
}

/// The `service` content type.
#[derive(Debug, Clone, Copy)]
pub struct Services;

impl ContentDomain for Services {
    type Record = Service;

    const NAME: &'static str = "services";
    const CONTENT_TYPE: &'static str = SERVICE;
    const SORT: SortOrder = SortOrder::Position;
    const CACHE_TIER: CacheTier = CacheTier::Extended;

    fn map_entry(reader: &FieldReader<'_>) -> Service {
        Service {
            id: reader.id(),
            title: reader.text("title"),
            slug: reader.text("slug"),
            summary: reader.text("summary"),
            description: reader.text("description"),
            icon: reader.optional_text("icon"),
            image: reader.asset_url("image"),
            featured: reader.flag("featured"),
            order: reader.order(),
        }
    }

    fn position(record: &Service) -> Option<i64> {
        Some(record.order)
    }
}

impl FeaturedDomain for Services {}
impl SluggedDomain for Services {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coachsite_core::EntryCollection;
    use serde_json::json;

    use super::*;
    use crate::mapper::map_domain;

    #[test]
    fn test_maps_service_fields() {
        let collection: EntryCollection = serde_json::from_value(json!({
            "items": [{
                "sys": {"id": "s1"},
                "fields": {
                    "title": "Executive coaching",
                    "slug": "executive-coaching",
                    "summary": "For senior leaders",
                    "description": "Six months of one-to-one sessions.",
                    "icon": "compass",
                    "image": {
                        "sys": {"id": "hero"},
                        "fields": {"file": {"url": "//images.ctfassets.net/hero.jpg"}}
                    },
                    "featured": true,
                    "order": 1
                }
            }]
        }))
        .unwrap();

        let service = map_domain::<Services>(Some(&collection)).remove(0);
        assert_eq!(service.slug, "executive-coaching");
        assert_eq!(service.summary, "For senior leaders");
        assert_eq!(service.icon.as_deref(), Some("compass"));
        assert_eq!(service.image.as_deref(), Some("https://images.ctfassets.net/hero.jpg"));
        assert!(service.featured);
        assert_eq!(service.order, 1);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let collection: EntryCollection = serde_json::from_value(json!({
            "items": [{"sys": {"id": "s2"}, "fields": {"title": "Team coaching", "featured": 0}}]
        }))
        .unwrap();

        assert_eq!(
            map_domain::<Services>(Some(&collection)),
            vec![Service {
                id: EntryId::new("s2"),
                title: "Team coaching".to_string(),
                slug: String::new(),
                summary: String::new(),
                description: String::new(),
                icon: None,
                image: None,
                featured: false,
                order: 999,
            }]
        );
    }
}
