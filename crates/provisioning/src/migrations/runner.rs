//! Sequential migration runner.
//!
//! Each migration ends in exactly one [`StepOutcome`]. The first `Failed`
//! stops the run; later migrations are listed in
//! [`MigrationReport::not_run`].

use tracing::{error, info, instrument, warn};

use super::{FieldEdit, IfMissing, Migration, Operation};
use crate::error::MigrationError;
use crate::management::{EditorControl, ManagementApi};
use crate::schema::ContentTypeSchema;

#[derive(Debug)]
pub enum StepOutcome {
    Applied,
    /// Nothing to do; carries the reason.
    Skipped(String),
    Failed(MigrationError),
}

impl StepOutcome {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

#[derive(Debug)]
pub struct MigrationStep {
    pub name: &'static str,
    pub outcome: StepOutcome,
}

/// Result of a migration run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Migrations that ran, in order.
    pub steps: Vec<MigrationStep>,
    /// Migrations left out after a failure.
    pub not_run: Vec<&'static str>,
}

impl MigrationReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed().is_none()
    }

    #[must_use]
    pub fn failed(&self) -> Option<&MigrationStep> {
        self.steps.iter().find(|s| s.outcome.is_failed())
    }

    #[must_use]
    pub fn applied(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Applied))
            .count()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Skipped(_)))
            .count()
    }
}

/// Run `migrations` in order, stopping at the first failure.
pub async fn run_migrations(api: &dyn ManagementApi, migrations: &[Migration]) -> MigrationReport {
    let mut report = MigrationReport::default();

    for (index, migration) in migrations.iter().enumerate() {
        let outcome = run_migration(api, migration).await;
        let failed = outcome.is_failed();

        match &outcome {
            StepOutcome::Applied => info!(migration = migration.name, "Migration applied"),
            StepOutcome::Skipped(reason) => {
                warn!(migration = migration.name, reason = %reason, "Migration skipped");
            }
            StepOutcome::Failed(e) => {
                error!(migration = migration.name, error = %e, "Migration failed");
            }
        }

        report.steps.push(MigrationStep {
            name: migration.name,
            outcome,
        });

        if failed {
            report.not_run = migrations
                .iter()
                .skip(index + 1)
                .map(|m| m.name)
                .collect();
            break;
        }
    }

    info!(
        applied = report.applied(),
        skipped = report.skipped(),
        not_run = report.not_run.len(),
        "Migration run complete"
    );

    report
}

/// Outcome of one operation that did not fail.
enum OperationOutcome {
    Applied,
    Skipped(String),
}

#[instrument(skip_all, fields(migration = migration.name))]
async fn run_migration(api: &dyn ManagementApi, migration: &Migration) -> StepOutcome {
    let mut skipped = Vec::new();

    for operation in &migration.operations {
        match apply(api, operation).await {
            Ok(OperationOutcome::Applied) => {}
            Ok(OperationOutcome::Skipped(reason)) => skipped.push(reason),
            Err(e) => return StepOutcome::Failed(e),
        }
    }

    if !migration.operations.is_empty() && skipped.len() == migration.operations.len() {
        StepOutcome::Skipped(skipped.join("; "))
    } else {
        StepOutcome::Applied
    }
}

async fn apply(
    api: &dyn ManagementApi,
    operation: &Operation,
) -> Result<OperationOutcome, MigrationError> {
    match operation {
        Operation::CreateContentType(schema) => {
            create_content_type(api, schema).await?;
            Ok(OperationOutcome::Applied)
        }
        Operation::EditContentType {
            id,
            edits,
            if_missing,
        } => edit_content_type(api, id, edits, *if_missing).await,
    }
}

async fn create_content_type(
    api: &dyn ManagementApi,
    schema: &ContentTypeSchema,
) -> Result<(), MigrationError> {
    let created = api
        .put_content_type(&schema.id, &schema.to_definition(), None)
        .await?;
    api.activate_content_type(&schema.id, created.sys.version)
        .await?;

    // The editor interface only exists once the type is active.
    let controls = schema.editor_controls();
    if !controls.is_empty() {
        let mut interface = api.get_editor_interface(&schema.id).await?;
        for control in controls {
            interface.upsert(control);
        }
        api.put_editor_interface(&schema.id, &interface).await?;
    }

    info!(
        content_type = %schema.id,
        fields = schema.fields.len(),
        "Content type created"
    );
    Ok(())
}

async fn edit_content_type(
    api: &dyn ManagementApi,
    id: &str,
    edits: &[FieldEdit],
    if_missing: IfMissing,
) -> Result<OperationOutcome, MigrationError> {
    let mut definition = match api.get_content_type(id).await {
        Ok(definition) => definition,
        Err(e) if e.is_not_found() => {
            return match if_missing {
                IfMissing::Skip => Ok(OperationOutcome::Skipped(format!(
                    "content type {id} not found"
                ))),
                IfMissing::Fail => Err(MigrationError::ContentTypeMissing(id.to_string())),
            };
        }
        Err(e) => return Err(e.into()),
    };

    let mut controls = Vec::new();
    let mut deletions = Vec::new();

    for edit in edits {
        match edit {
            FieldEdit::CreateField(field) => {
                if definition.field(&field.id).is_some() {
                    return Err(MigrationError::FieldExists {
                        content_type: id.to_string(),
                        field: field.id.clone(),
                    });
                }
                definition.fields.push(field.to_definition());
                controls.extend(field.editor_control());
            }
            FieldEdit::DeleteField(field_id) => {
                let Some(field) = definition.field_mut(field_id) else {
                    return Err(MigrationError::FieldMissing {
                        content_type: id.to_string(),
                        field: field_id.clone(),
                    });
                };
                field.omitted = true;
                deletions.push(field_id.clone());
            }
            FieldEdit::SetWidget {
                field_id,
                widget,
                help_text,
            } => {
                if definition.field(field_id).is_none() {
                    return Err(MigrationError::FieldMissing {
                        content_type: id.to_string(),
                        field: field_id.clone(),
                    });
                }
                controls.push(EditorControl {
                    field_id: field_id.clone(),
                    widget_id: Some(widget.widget_id().to_string()),
                    widget_namespace: Some("builtin".to_string()),
                    settings: help_text
                        .as_ref()
                        .map(|text| serde_json::json!({"helpText": text})),
                });
            }
        }
    }

    // New fields and omissions go live first; a field can only be deleted
    // after its omission has been activated.
    let saved = api
        .put_content_type(id, &definition, Some(definition.sys.version))
        .await?;
    let mut active = api.activate_content_type(id, saved.sys.version).await?;

    if !deletions.is_empty() {
        for field in &mut active.fields {
            if deletions.contains(&field.id) {
                field.deleted = true;
            }
        }
        let saved = api
            .put_content_type(id, &active, Some(active.sys.version))
            .await?;
        api.activate_content_type(id, saved.sys.version).await?;
    }

    if !controls.is_empty() || !deletions.is_empty() {
        let mut interface = api.get_editor_interface(id).await?;
        for field_id in &deletions {
            interface.remove(field_id);
        }
        for control in controls {
            interface.upsert(control);
        }
        api.put_editor_interface(id, &interface).await?;
    }

    info!(
        content_type = id,
        edits = edits.len(),
        deleted = deletions.len(),
        "Content type edited"
    );
    Ok(OperationOutcome::Applied)
}
