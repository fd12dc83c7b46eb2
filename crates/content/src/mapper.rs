//! Entry mapping.
//!
//! Converts raw entries into domain records. Mapping is total: missing fields
//! take their defaults, values of the wrong type are treated as missing (and
//! logged at `debug`), and an absent or empty collection maps to an empty list.
//!
//! Defaulting policy:
//! - required text: `""`
//! - optional text, assets, dates: `None`
//! - flags: JavaScript-style truthiness of the raw value, absent = `false`
//! - `order`: [`DEFAULT_ORDER`] when absent

use chrono::{DateTime, NaiveDate, Utc};
use coachsite_core::{Asset, ContentEntry, DEFAULT_ORDER, EntryCollection, EntryId, Link, LinkType};
use serde_json::Value;

use crate::domains::ContentDomain;

/// Typed, lenient access to one entry's fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    entry: &'a ContentEntry,
    collection: Option<&'a EntryCollection>,
}

impl<'a> FieldReader<'a> {
    /// Reader resolving asset links against `collection`'s includes.
    #[must_use]
    pub const fn new(entry: &'a ContentEntry, collection: Option<&'a EntryCollection>) -> Self {
        Self { entry, collection }
    }

    /// The entry's system id.
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.entry.sys.id.clone()
    }

    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.entry.sys.created_at
    }

    fn raw(&self, name: &str) -> Option<&'a Value> {
        self.entry.fields.get(name).filter(|v| !v.is_null())
    }

    /// Required text field; `""` when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.optional_text(name).unwrap_or_default()
    }

    /// Optional text field.
    #[must_use]
    pub fn optional_text(&self, name: &str) -> Option<String> {
        let value = self.raw(name)?;
        if let Some(s) = value.as_str() {
            return Some(s.to_owned());
        }
        self.mismatch(name, "text", value);
        None
    }

    /// Boolean flag using truthiness of the raw value.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.raw(name).is_some_and(truthy)
    }

    /// Optional integer field. Fractional numbers are truncated.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn integer(&self, name: &str) -> Option<i64> {
        let value = self.raw(name)?;
        if let Some(n) = value.as_i64() {
            return Some(n);
        }
        if let Some(f) = value.as_f64().filter(|f| f.is_finite()) {
            return Some(f.trunc() as i64);
        }
        self.mismatch(name, "integer", value);
        None
    }

    /// The `order` field, defaulting to [`DEFAULT_ORDER`].
    #[must_use]
    pub fn order(&self) -> i64 {
        self.integer("order").unwrap_or(DEFAULT_ORDER)
    }

    /// Date field: RFC 3339 timestamp, minute-precision date time (with or
    /// without offset) or `YYYY-MM-DD` (midnight UTC).
    #[must_use]
    pub fn date(&self, name: &str) -> Option<DateTime<Utc>> {
        let raw = self.optional_text(name)?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Some(ts.with_timezone(&Utc));
        }
        // The CMS date widget emits minute precision, with or without an offset.
        if let Ok(ts) = DateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M%:z") {
            return Some(ts.with_timezone(&Utc));
        }
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M") {
            return Some(naive.and_utc());
        }
        if let Ok(day) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            return day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
        tracing::debug!(entry_id = %self.entry.sys.id, field = name, value = %raw, "Unparsable date");
        None
    }

    /// URL of an asset field.
    ///
    /// Accepts an unresolved link (looked up in the collection's includes) or
    /// an inline asset. Protocol-relative URLs become `https:` URLs.
    #[must_use]
    pub fn asset_url(&self, name: &str) -> Option<String> {
        let value = self.raw(name)?;

        if let Some(link) = Link::from_value(value) {
            if link.link_type != LinkType::Asset {
                self.mismatch(name, "asset link", value);
                return None;
            }
            return self.collection?.asset(&link.id)?.url();
        }

        match serde_json::from_value::<Asset>(value.clone()) {
            Ok(asset) => asset.url(),
            Err(_) => {
                self.mismatch(name, "asset", value);
                None
            }
        }
    }

    fn mismatch(&self, name: &str, expected: &str, value: &Value) {
        tracing::debug!(
            entry_id = %self.entry.sys.id,
            field = name,
            expected,
            actual = value_kind(value),
            "Unexpected field type, using default"
        );
    }
}

/// JavaScript truthiness: `false`, `0`, `""` and `null` are false.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Map every entry of a collection with `map`.
///
/// `None` or an empty collection yields an empty list.
pub fn map_entries<T>(
    collection: Option<&EntryCollection>,
    map: impl Fn(&FieldReader<'_>) -> T,
) -> Vec<T> {
    let Some(collection) = collection else {
        return Vec::new();
    };

    collection
        .items
        .iter()
        .map(|entry| map(&FieldReader::new(entry, Some(collection))))
        .collect()
}

/// Map a collection into a domain's records.
pub fn map_domain<D: ContentDomain>(collection: Option<&EntryCollection>) -> Vec<D::Record> {
    map_entries(collection, D::map_entry)
}
