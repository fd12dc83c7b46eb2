//! Schema migrations.
//!
//! A [`Migration`] is a named list of declarative [`Operation`]s. The
//! [`registry`] lists every migration in the order it must run; later
//! migrations may edit types created by earlier ones.
//!
//! Migrations are not recorded anywhere. Re-running `001-create-client`
//! against a space that already has the type fails with a conflict, which
//! stops the run.

mod runner;

pub use runner::{MigrationReport, MigrationStep, StepOutcome, run_migrations};

use std::collections::BTreeMap;

use coachsite_core::WHY_CHOOSE_US;

use crate::content_types;
use crate::schema::{ContentTypeSchema, EditorWidget, FieldKind, FieldSchema, Validation};

/// What to do when an edited content type does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfMissing {
    /// Report the step as skipped.
    Skip,
    Fail,
}

/// A change to one field of an existing content type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    CreateField(FieldSchema),
    /// Omit, activate, then delete and activate again.
    DeleteField(String),
    SetWidget {
        field_id: String,
        widget: EditorWidget,
        help_text: Option<String>,
    },
}

impl FieldEdit {
    /// Apply the edit to an in-memory schema.
    pub fn apply_to(&self, schema: &mut ContentTypeSchema) {
        match self {
            Self::CreateField(field) => schema.fields.push(field.clone()),
            Self::DeleteField(field_id) => schema.fields.retain(|f| &f.id != field_id),
            Self::SetWidget {
                field_id,
                widget,
                help_text,
            } => {
                if let Some(field) = schema.fields.iter_mut().find(|f| &f.id == field_id) {
                    field.widget = Some(*widget);
                    field.help_text.clone_from(help_text);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create, activate and configure editor widgets for a new type.
    CreateContentType(ContentTypeSchema),
    EditContentType {
        id: String,
        edits: Vec<FieldEdit>,
        if_missing: IfMissing,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub name: &'static str,
    pub operations: Vec<Operation>,
}

impl Migration {
    fn create(name: &'static str, schema: ContentTypeSchema) -> Self {
        Self {
            name,
            operations: vec![Operation::CreateContentType(schema)],
        }
    }
}

/// All migrations in run order.
#[must_use]
pub fn registry() -> Vec<Migration> {
    vec![
        Migration::create("001-create-client", content_types::client()),
        Migration::create("002-create-result", content_types::result()),
        Migration::create("003-create-testimonial", content_types::testimonial()),
        Migration::create("004-create-why-choose-us", content_types::why_choose_us()),
        Migration::create("005-create-service", content_types::service()),
        Migration::create("006-create-team-member", content_types::team_member()),
        Migration::create("007-create-blog-post", content_types::blog_post()),
        Migration::create("008-create-event", content_types::event()),
        why_choose_us_icon_image(),
    ]
}

/// Replace the free-text `icon` with an uploaded image.
fn why_choose_us_icon_image() -> Migration {
    Migration {
        name: "009-why-choose-us-icon-image",
        operations: vec![Operation::EditContentType {
            id: WHY_CHOOSE_US.to_string(),
            edits: vec![
                FieldEdit::CreateField(
                    FieldSchema::new("iconImage", "Icon image", FieldKind::AssetLink)
                        .validation(Validation::mime_types(&["image"])),
                ),
                FieldEdit::SetWidget {
                    field_id: "iconImage".to_string(),
                    widget: EditorWidget::AssetLinkEditor,
                    help_text: Some("Square SVG or PNG".to_string()),
                },
                FieldEdit::DeleteField("icon".to_string()),
            ],
            if_missing: IfMissing::Skip,
        }],
    }
}

/// Schemas as they stand after every migration in the registry.
#[must_use]
pub fn resolved_schemas() -> BTreeMap<String, ContentTypeSchema> {
    let mut schemas = BTreeMap::new();

    for migration in registry() {
        for operation in migration.operations {
            match operation {
                Operation::CreateContentType(schema) => {
                    schemas.insert(schema.id.clone(), schema);
                }
                Operation::EditContentType { id, edits, .. } => {
                    if let Some(schema) = schemas.get_mut(&id) {
                        for edit in &edits {
                            edit.apply_to(schema);
                        }
                    }
                }
            }
        }
    }

    schemas
}
