//! Declarative content-type schemas.
//!
//! A [`ContentTypeSchema`] describes fields, validation rules and editor
//! widgets. It converts into the management API's content-type and
//! editor-interface JSON, and is also used to check seed records locally.
//!
//! ```rust,ignore
//! ContentTypeSchema::new("client", "Client")
//!     .display_field("name")
//!     .field(
//!         FieldSchema::new("name", "Name", FieldKind::ShortText)
//!             .required()
//!             .validation(Validation::size(Some(1), Some(100)))
//!             .widget(EditorWidget::SingleLine),
//!     )
//! ```

use serde_json::{Map, Value, json};

use crate::management::{ContentTypeDefinition, EditorControl, FieldDefinition, ResourceSys};

/// Slug pattern shared by every slugged content type.
pub const SLUG_PATTERN: &str = "^[a-z0-9]+(?:-[a-z0-9]+)*$";

/// Absolute http(s) URL.
pub const URL_PATTERN: &str = r"^https?://[^\s/$.?#][^\s]*$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Up to 256 characters (`Symbol`).
    ShortText,
    /// Up to 50k characters (`Text`).
    LongText,
    Integer,
    Boolean,
    Date,
    AssetLink,
    EntryLink,
}

impl FieldKind {
    /// API `type` and `linkType`.
    #[must_use]
    pub const fn api_type(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::ShortText => ("Symbol", None),
            Self::LongText => ("Text", None),
            Self::Integer => ("Integer", None),
            Self::Boolean => ("Boolean", None),
            Self::Date => ("Date", None),
            Self::AssetLink => ("Link", Some("Asset")),
            Self::EntryLink => ("Link", Some("Entry")),
        }
    }
}

/// A single validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Text length in characters.
    Size { min: Option<u64>, max: Option<u64> },
    /// Numeric range, inclusive.
    Range { min: Option<i64>, max: Option<i64> },
    Regexp { pattern: String },
    In(Vec<String>),
    Unique,
    MimeTypeGroups(Vec<String>),
    LinkContentType(Vec<String>),
}

/// A validation rule with an optional editor-facing message.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub rule: Rule,
    pub message: Option<String>,
}

impl Validation {
    const fn new(rule: Rule) -> Self {
        Self { rule, message: None }
    }

    #[must_use]
    pub const fn size(min: Option<u64>, max: Option<u64>) -> Self {
        Self::new(Rule::Size { min, max })
    }

    #[must_use]
    pub const fn range(min: Option<i64>, max: Option<i64>) -> Self {
        Self::new(Rule::Range { min, max })
    }

    #[must_use]
    pub fn regexp(pattern: &str) -> Self {
        Self::new(Rule::Regexp {
            pattern: pattern.to_string(),
        })
    }

    #[must_use]
    pub fn one_of(values: &[&str]) -> Self {
        Self::new(Rule::In(values.iter().map(ToString::to_string).collect()))
    }

    #[must_use]
    pub const fn unique() -> Self {
        Self::new(Rule::Unique)
    }

    #[must_use]
    pub fn mime_types(groups: &[&str]) -> Self {
        Self::new(Rule::MimeTypeGroups(
            groups.iter().map(ToString::to_string).collect(),
        ))
    }

    #[must_use]
    pub fn link_content_type(ids: &[&str]) -> Self {
        Self::new(Rule::LinkContentType(
            ids.iter().map(ToString::to_string).collect(),
        ))
    }

    #[must_use]
    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// API JSON for this validation.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = match &self.rule {
            Rule::Size { min, max } => json!({"size": bounds(*min, *max)}),
            Rule::Range { min, max } => json!({"range": bounds(*min, *max)}),
            Rule::Regexp { pattern } => json!({"regexp": {"pattern": pattern}}),
            Rule::In(values) => json!({"in": values}),
            Rule::Unique => json!({"unique": true}),
            Rule::MimeTypeGroups(groups) => json!({"linkMimetypeGroup": groups}),
            Rule::LinkContentType(ids) => json!({"linkContentType": ids}),
        };
        if let (Some(message), Value::Object(map)) = (&self.message, &mut object) {
            map.insert("message".to_string(), Value::String(message.clone()));
        }
        object
    }
}

fn bounds<T: Into<Value>>(min: Option<T>, max: Option<T>) -> Value {
    let mut map = Map::new();
    if let Some(min) = min {
        map.insert("min".to_string(), min.into());
    }
    if let Some(max) = max {
        map.insert("max".to_string(), max.into());
    }
    Value::Object(map)
}

/// Built-in editing widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorWidget {
    SingleLine,
    MultipleLine,
    Markdown,
    UrlEditor,
    SlugEditor,
    NumberEditor,
    Boolean,
    DatePicker,
    Dropdown,
    Rating,
    AssetLinkEditor,
    EntryLinkEditor,
}

impl EditorWidget {
    #[must_use]
    pub const fn widget_id(self) -> &'static str {
        match self {
            Self::SingleLine => "singleLine",
            Self::MultipleLine => "multipleLine",
            Self::Markdown => "markdown",
            Self::UrlEditor => "urlEditor",
            Self::SlugEditor => "slugEditor",
            Self::NumberEditor => "numberEditor",
            Self::Boolean => "boolean",
            Self::DatePicker => "datePicker",
            Self::Dropdown => "dropdown",
            Self::Rating => "rating",
            Self::AssetLinkEditor => "assetLinkEditor",
            Self::EntryLinkEditor => "entryLinkEditor",
        }
    }
}

/// One field of a content type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub id: String,
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub validations: Vec<Validation>,
    pub widget: Option<EditorWidget>,
    pub help_text: Option<String>,
}

impl FieldSchema {
    #[must_use]
    pub fn new(id: &str, name: &str, kind: FieldKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            required: false,
            validations: Vec::new(),
            widget: None,
            help_text: None,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn validation(mut self, validation: Validation) -> Self {
        self.validations.push(validation);
        self
    }

    #[must_use]
    pub const fn widget(mut self, widget: EditorWidget) -> Self {
        self.widget = Some(widget);
        self
    }

    #[must_use]
    pub fn help_text(mut self, text: &str) -> Self {
        self.help_text = Some(text.to_string());
        self
    }

    #[must_use]
    pub fn to_definition(&self) -> FieldDefinition {
        let (field_type, link_type) = self.kind.api_type();
        FieldDefinition {
            id: self.id.clone(),
            name: self.name.clone(),
            field_type: field_type.to_string(),
            link_type: link_type.map(ToString::to_string),
            required: self.required,
            localized: false,
            validations: self.validations.iter().map(Validation::to_value).collect(),
            omitted: false,
            deleted: false,
        }
    }

    /// Editor control, when a widget or help text is set.
    #[must_use]
    pub fn editor_control(&self) -> Option<EditorControl> {
        if self.widget.is_none() && self.help_text.is_none() {
            return None;
        }
        Some(EditorControl {
            field_id: self.id.clone(),
            widget_id: self.widget.map(|w| w.widget_id().to_string()),
            widget_namespace: self.widget.map(|_| "builtin".to_string()),
            settings: self
                .help_text
                .as_ref()
                .map(|text| json!({"helpText": text})),
        })
    }
}

/// A content type with its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentTypeSchema {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub display_field: Option<String>,
    pub fields: Vec<FieldSchema>,
}

impl ContentTypeSchema {
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            display_field: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn display_field(mut self, field: &str) -> Self {
        self.display_field = Some(field.to_string());
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn get_field(&self, id: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Content-type body for the management API.
    #[must_use]
    pub fn to_definition(&self) -> ContentTypeDefinition {
        ContentTypeDefinition {
            sys: ResourceSys {
                id: self.id.clone(),
                ..ResourceSys::default()
            },
            name: self.name.clone(),
            description: self.description.clone(),
            display_field: self.display_field.clone(),
            fields: self.fields.iter().map(FieldSchema::to_definition).collect(),
        }
    }

    /// Editor controls for every field that sets a widget or help text.
    #[must_use]
    pub fn editor_controls(&self) -> Vec<EditorControl> {
        self.fields.iter().filter_map(FieldSchema::editor_control).collect()
    }
}
