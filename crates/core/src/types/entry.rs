//! Entry envelope and entry collections as returned by the delivery API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::asset::{Asset, Link, LinkType};
use super::id::EntryId;

/// System metadata attached to every entry.
///
/// `id` is immutable and unique within a space/environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetadata {
    pub id: EntryId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentTypeRef>,
}

/// Link from an entry to its content type: `{"sys": {"id": "client", ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeRef {
    pub sys: ContentTypeRefSys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeRefSys {
    pub id: String,
}

impl SystemMetadata {
    /// Metadata carrying only an id.
    #[must_use]
    pub fn with_id(id: impl Into<EntryId>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            updated_at: None,
            content_type: None,
        }
    }

    /// Id of the entry's content type, when the CMS reported one.
    #[must_use]
    pub fn content_type_id(&self) -> Option<&str> {
        self.content_type.as_ref().map(|ct| ct.sys.id.as_str())
    }
}

/// A single content record: system metadata plus free-form fields.
///
/// Field values are kept as raw JSON; domain mappers decide how to read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub sys: SystemMetadata,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl ContentEntry {
    /// Raw value of a field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Linked assets returned alongside a collection. Linked entries are not
/// read by any domain and are dropped on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Includes {
    #[serde(rename = "Asset", default)]
    pub assets: Vec<Asset>,
}

/// A page of entries.
///
/// The default value is the empty collection
/// `{items: [], total: 0, skip: 0, limit: 0}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryCollection {
    #[serde(default)]
    pub items: Vec<ContentEntry>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub includes: Includes,
}

impl EntryCollection {
    /// The empty collection.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the collection holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an included asset by id.
    #[must_use]
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.includes.assets.iter().find(|a| a.sys.id.as_str() == id)
    }

    /// Consume the collection, replacing asset links in item fields with the
    /// included assets they point at. Links without a matching include stay
    /// as they are.
    #[must_use]
    pub fn into_resolved_items(self) -> Vec<ContentEntry> {
        let Self {
            items, includes, ..
        } = self;

        items
            .into_iter()
            .map(|mut entry| {
                for value in entry.fields.values_mut() {
                    let Some(link) = Link::from_value(value) else {
                        continue;
                    };
                    if link.link_type != LinkType::Asset {
                        continue;
                    }
                    if let Some(asset) = includes.assets.iter().find(|a| a.sys.id.as_str() == link.id)
                        && let Ok(resolved) = serde_json::to_value(asset)
                    {
                        *value = resolved;
                    }
                }
                entry
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_collection_shape() {
        let empty = EntryCollection::empty();
        assert!(empty.is_empty());
        assert_eq!(
            (empty.total, empty.skip, empty.limit),
            (0, 0, 0),
            "stub collections report zero totals"
        );
    }

    #[test]
    fn test_collection_deserializes_delivery_payload() {
        let collection: EntryCollection = serde_json::from_value(json!({
            "sys": {"type": "Array"},
            "total": 1,
            "skip": 0,
            "limit": 100,
            "items": [{
                "sys": {
                    "id": "abc",
                    "type": "Entry",
                    "createdAt": "2025-03-01T10:00:00.000Z",
                    "updatedAt": "2025-03-02T10:00:00.000Z",
                    "contentType": {"sys": {"type": "Link", "linkType": "ContentType", "id": "client"}}
                },
                "fields": {"name": "Acme"}
            }],
            "includes": {
                "Asset": [{"sys": {"id": "logo"}, "fields": {"file": {"url": "//x/logo.png"}}}],
                "Entry": [{"sys": {"id": "author"}, "fields": {"name": "Jordan"}}]
            }
        }))
        .unwrap();

        assert_eq!(collection.total, 1);
        assert_eq!(collection.includes.assets.len(), 1);
        let entry = &collection.items[0];
        assert_eq!(entry.sys.id.as_str(), "abc");
        assert!(entry.sys.created_at.is_some());
        assert_eq!(entry.field("name"), Some(&json!("Acme")));
        assert!(collection.asset("logo").is_some());
        assert!(collection.asset("missing").is_none());
    }

    #[test]
    fn test_into_resolved_items_inlines_assets() {
        let collection: EntryCollection = serde_json::from_value(json!({
            "items": [{
                "sys": {"id": "abc", "contentType": {"sys": {"id": "client"}}},
                "fields": {
                    "logo": {"sys": {"type": "Link", "linkType": "Asset", "id": "logo"}},
                    "missing": {"sys": {"type": "Link", "linkType": "Asset", "id": "gone"}}
                }
            }],
            "includes": {
                "Asset": [{"sys": {"id": "logo"}, "fields": {"file": {"url": "//x/logo.png"}}}]
            }
        }))
        .unwrap();

        let items = collection.into_resolved_items();
        let entry = &items[0];
        assert_eq!(entry.sys.content_type_id(), Some("client"));

        let logo: Asset = serde_json::from_value(entry.field("logo").unwrap().clone()).unwrap();
        assert_eq!(logo.url().as_deref(), Some("https://x/logo.png"));
        assert!(Link::from_value(entry.field("missing").unwrap()).is_some());
    }

    #[test]
    fn test_minimal_entry_needs_only_id() {
        let entry: ContentEntry = serde_json::from_value(json!({"sys": {"id": "x"}})).unwrap();
        assert_eq!(entry.sys, SystemMetadata::with_id("x"));
        assert!(entry.fields.is_empty());
    }
}
