//! Client results (case-study outcomes).

use coachsite_core::{EntryId, RESULT};
use serde::Serialize;

use super::{ContentDomain, FeaturedDomain, SortOrder};
use crate::cache::CacheTier;
use crate::mapper::FieldReader;

/// A measurable outcome achieved for a client, e.g. "+40% revenue".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientResult {
    pub id: EntryId,
    pub title: String,
    /// Headline figure, e.g. "3x" or "+40%".
    pub metric: String,
    pub description: String,
    pub client_name: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
    pub order: i64,
}

/// The `result` content type.
#[derive(Debug, Clone, Copy)]
pub struct Results;

impl ContentDomain for Results {
    type Record = ClientResult;

    const NAME: &'static str = "results";
    const CONTENT_TYPE: &'static str = RESULT;
    const SORT: SortOrder = SortOrder::Position;
    const CACHE_TIER: CacheTier = CacheTier::Extended;

    fn map_entry(reader: &FieldReader<'_>) -> ClientResult {
        ClientResult {
            id: reader.id(),
            title: reader.text("title"),
            metric: reader.text("metric"),
            description: reader.text("description"),
            client_name: reader.optional_text("clientName"),
            image: reader.asset_url("image"),
            featured: reader.flag("featured"),
            order: reader.order(),
        }
    }

    fn position(record: &ClientResult) -> Option<i64> {
        Some(record.order)
    }
}

impl FeaturedDomain for Results {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coachsite_core::EntryCollection;
    use serde_json::json;

    use super::*;
    use crate::mapper::map_domain;

    #[test]
    fn test_maps_result_fields() {
        let collection: EntryCollection = serde_json::from_value(json!({
            "items": [{
                "sys": {"id": "r1"},
                "fields": {
                    "title": "Sales team turnaround",
                    "metric": "+40%",
                    "description": "Quarterly revenue after six months.",
                    "clientName": "Northwind Analytics",
                    "image": {"sys": {"type": "Link", "linkType": "Asset", "id": "chart"}},
                    "featured": true,
                    "order": 3
                }
            }],
            "includes": {"Asset": [
                {"sys": {"id": "chart"}, "fields": {"file": {"url": "//images.ctfassets.net/chart.png"}}}
            ]}
        }))
        .unwrap();

        let result = map_domain::<Results>(Some(&collection)).remove(0);
        assert_eq!(result.metric, "+40%");
        assert_eq!(result.client_name.as_deref(), Some("Northwind Analytics"));
        assert_eq!(result.image.as_deref(), Some("https://images.ctfassets.net/chart.png"));
        assert!(result.featured);
        assert_eq!(result.order, 3);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let collection: EntryCollection = serde_json::from_value(json!({
            "items": [{"sys": {"id": "r2"}, "fields": {"title": "Retention"}}]
        }))
        .unwrap();

        assert_eq!(
            map_domain::<Results>(Some(&collection)),
            vec![ClientResult {
                id: EntryId::new("r2"),
                title: "Retention".to_string(),
                metric: String::new(),
                description: String::new(),
                client_name: None,
                image: None,
                featured: false,
                order: 999,
            }]
        );
    }
}
