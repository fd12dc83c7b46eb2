//! Management API wire types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// System metadata of a versioned management resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSys {
    #[serde(default)]
    pub id: String,
    /// Current version; sent back as `X-Contentful-Version` on updates.
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_version: Option<u64>,
}

/// A content type as stored by the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeDefinition {
    /// Returned by the API, never sent.
    #[serde(default, skip_serializing)]
    pub sys: ResourceSys,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl ContentTypeDefinition {
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn field_mut(&mut self, id: &str) -> Option<&mut FieldDefinition> {
        self.fields.iter_mut().find(|f| f.id == id)
    }
}

/// A field of a content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    /// `Symbol`, `Text`, `Integer`, `Boolean`, `Date` or `Link`.
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub localized: bool,
    #[serde(default)]
    pub validations: Vec<Value>,
    /// Hidden from the delivery API; first phase of a deletion.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub omitted: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
}

/// Widget assignment for the editing UI of a content type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorInterface {
    #[serde(default, skip_serializing)]
    pub sys: ResourceSys,
    #[serde(default)]
    pub controls: Vec<EditorControl>,
}

impl EditorInterface {
    /// Replace the control for `control.field_id`, or append it.
    pub fn upsert(&mut self, control: EditorControl) {
        match self.controls.iter_mut().find(|c| c.field_id == control.field_id) {
            Some(existing) => *existing = control,
            None => self.controls.push(control),
        }
    }

    /// Drop the control for a removed field.
    pub fn remove(&mut self, field_id: &str) {
        self.controls.retain(|c| c.field_id != field_id);
    }

    #[must_use]
    pub fn control(&self, field_id: &str) -> Option<&EditorControl> {
        self.controls.iter().find(|c| c.field_id == field_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorControl {
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

/// Localized entry fields: `{fieldId: {locale: value}}`.
pub type EntryFields = Map<String, Value>;

/// Request body for entry creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewEntry<'a> {
    pub fields: &'a EntryFields,
}

/// Response envelope for entry writes; only `sys` matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryResponse {
    pub sys: ResourceSys,
}
