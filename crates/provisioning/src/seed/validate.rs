//! Local checks of sample records against a content-type schema.
//!
//! Mirrors what the CMS enforces on publish so bad sample data fails before
//! anything is written. Uniqueness, mime types and link targets need the
//! remote space and are left to the CMS.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::{Map, Value};

use crate::schema::{ContentTypeSchema, FieldKind, FieldSchema, Rule, Validation};

/// Longest `Symbol` the CMS accepts.
const SHORT_TEXT_MAX: usize = 256;

/// Check one record. Returns the first violation.
///
/// # Errors
///
/// Returns a description of the violation.
pub fn validate_record(
    schema: &ContentTypeSchema,
    record: &Map<String, Value>,
) -> Result<(), String> {
    if let Some(unknown) = record.keys().find(|k| schema.get_field(k).is_none()) {
        return Err(format!("unknown field {unknown}"));
    }

    for field in &schema.fields {
        match record.get(&field.id).filter(|v| !is_blank(v)) {
            None if field.required => {
                return Err(format!("missing required field {}", field.id));
            }
            None => {}
            Some(value) => validate_value(field, value)?,
        }
    }

    Ok(())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn validate_value(field: &FieldSchema, value: &Value) -> Result<(), String> {
    let type_ok = match field.kind {
        FieldKind::ShortText => value
            .as_str()
            .is_some_and(|s| s.chars().count() <= SHORT_TEXT_MAX),
        FieldKind::LongText => value.is_string(),
        FieldKind::Integer => value.is_i64(),
        FieldKind::Boolean => value.is_boolean(),
        FieldKind::Date => value.as_str().is_some_and(is_date),
        FieldKind::AssetLink | FieldKind::EntryLink => value.is_object(),
    };
    if !type_ok {
        return Err(format!("{} is not a valid {:?}", field.id, field.kind));
    }

    for validation in &field.validations {
        check_rule(validation, value).map_err(|reason| {
            let detail = validation.message.as_deref().unwrap_or(&reason);
            format!("{}: {detail}", field.id)
        })?;
    }

    Ok(())
}

fn check_rule(validation: &Validation, value: &Value) -> Result<(), String> {
    match &validation.rule {
        Rule::Size { min, max } => {
            let Some(len) = value.as_str().map(|s| s.chars().count() as u64) else {
                return Ok(());
            };
            if min.is_some_and(|min| len < min) || max.is_some_and(|max| len > max) {
                return Err(format!("length {len} outside {min:?}..={max:?}"));
            }
        }
        Rule::Range { min, max } => {
            let Some(n) = value.as_i64() else {
                return Ok(());
            };
            if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
                return Err(format!("{n} outside {min:?}..={max:?}"));
            }
        }
        Rule::Regexp { pattern } => {
            let Some(text) = value.as_str() else {
                return Ok(());
            };
            let regex = Regex::new(pattern).map_err(|e| format!("invalid pattern: {e}"))?;
            if !regex.is_match(text) {
                return Err(format!("'{text}' does not match {pattern}"));
            }
        }
        Rule::In(allowed) => {
            if let Some(text) = value.as_str()
                && !allowed.iter().any(|a| a == text)
            {
                return Err(format!("'{text}' is not one of {}", allowed.join(", ")));
            }
        }
        Rule::Unique | Rule::MimeTypeGroups(_) | Rule::LinkContentType(_) => {}
    }
    Ok(())
}

fn is_date(raw: &str) -> bool {
    DateTime::parse_from_rfc3339(raw).is_ok()
        || DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z").is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::content_types;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_valid_record() {
        let schema = content_types::service();
        let ok = record(json!({
            "title": "Executive coaching",
            "slug": "executive-coaching",
            "summary": "For senior leaders",
            "icon": "compass",
            "featured": true,
            "order": 1
        }));
        assert_eq!(validate_record(&schema, &ok), Ok(()));
    }

    #[test]
    fn test_required_and_unknown_fields() {
        let schema = content_types::client();

        let err = validate_record(&schema, &record(json!({"website": "https://x.example"})));
        assert_eq!(err, Err("missing required field name".to_string()));

        let err = validate_record(&schema, &record(json!({"name": "  "})));
        assert_eq!(err, Err("missing required field name".to_string()));

        let err = validate_record(&schema, &record(json!({"name": "Acme", "tagline": "x"})));
        assert_eq!(err, Err("unknown field tagline".to_string()));
    }

    #[test]
    fn test_rule_violations_use_message() {
        let schema = content_types::service();
        let base = json!({"title": "T", "summary": "S"});

        let mut bad_slug = record(base.clone());
        bad_slug.insert("slug".to_string(), json!("Not A Slug"));
        assert_eq!(
            validate_record(&schema, &bad_slug),
            Err("slug: Lowercase letters, digits and hyphens only".to_string())
        );

        let mut bad_icon = record(base);
        bad_icon.insert("slug".to_string(), json!("ok"));
        bad_icon.insert("icon".to_string(), json!("rocket"));
        let err = validate_record(&schema, &bad_icon).unwrap_err();
        assert!(err.starts_with("icon: 'rocket' is not one of"), "{err}");
    }

    #[test]
    fn test_ranges_and_types() {
        let schema = content_types::testimonial();
        let base = json!({"quote": "A long enough quote", "authorName": "Sam"});

        let mut high = record(base.clone());
        high.insert("rating".to_string(), json!(6));
        assert_eq!(
            validate_record(&schema, &high),
            Err("rating: Rating must be 1-5".to_string())
        );

        let mut text_rating = record(base.clone());
        text_rating.insert("rating".to_string(), json!("five"));
        assert!(validate_record(&schema, &text_rating).unwrap_err().contains("Integer"));

        let mut short = record(base);
        short.insert("quote".to_string(), json!("Too short"));
        assert!(validate_record(&schema, &short).unwrap_err().starts_with("quote: length 9"));
    }

    #[test]
    fn test_dates() {
        assert!(is_date("2025-01-14T09:00:00Z"));
        assert!(is_date("2026-11-12T09:30+01:00"));
        assert!(is_date("2026-11-12T09:30"));
        assert!(is_date("2026-11-12"));
        assert!(!is_date("next week"));
    }
}
