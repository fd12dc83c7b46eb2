//! In-memory management API for unit tests.
//!
//! Enforces the rules migrations depend on: versions must match, creating an
//! existing type conflicts, and a field can only be deleted once its omission
//! has been published.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    ContentTypeDefinition, EditorControl, EditorInterface, EntryFields, ManagementApi, ResourceSys,
};
use crate::error::ManagementError;

#[derive(Debug, Clone)]
pub struct FakeEntry {
    pub content_type: String,
    pub fields: EntryFields,
    pub version: u64,
    pub published: bool,
}

#[derive(Debug, Default)]
struct State {
    content_types: BTreeMap<String, ContentTypeDefinition>,
    published: BTreeMap<String, ContentTypeDefinition>,
    interfaces: BTreeMap<String, EditorInterface>,
    entries: BTreeMap<String, FakeEntry>,
    next_entry: usize,
    /// Fail the n-th entry creation (0-based) with a 500.
    fail_create_at: Option<usize>,
    creates: usize,
}

#[derive(Debug, Default)]
pub struct FakeManagement {
    state: Mutex<State>,
}

fn lock_err() -> ManagementError {
    ManagementError::Api {
        status: 500,
        message: "fake state poisoned".to_string(),
    }
}

impl FakeManagement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `index`-th `create_entry` call fail.
    pub fn fail_create_at(self, index: usize) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.fail_create_at = Some(index);
        }
        self
    }

    pub fn content_type(&self, id: &str) -> Option<ContentTypeDefinition> {
        self.state.lock().ok()?.content_types.get(id).cloned()
    }

    pub fn published_content_type(&self, id: &str) -> Option<ContentTypeDefinition> {
        self.state.lock().ok()?.published.get(id).cloned()
    }

    pub fn editor_interface(&self, id: &str) -> Option<EditorInterface> {
        self.state.lock().ok()?.interfaces.get(id).cloned()
    }

    pub fn entries_of(&self, content_type: &str) -> Vec<FakeEntry> {
        self.state.lock().map_or_else(
            |_| Vec::new(),
            |state| {
                state
                    .entries
                    .values()
                    .filter(|e| e.content_type == content_type)
                    .cloned()
                    .collect()
            },
        )
    }
}

#[async_trait]
impl ManagementApi for FakeManagement {
    async fn get_content_type(&self, id: &str) -> Result<ContentTypeDefinition, ManagementError> {
        let state = self.state.lock().map_err(|_| lock_err())?;
        state
            .content_types
            .get(id)
            .cloned()
            .ok_or_else(|| ManagementError::NotFound(format!("content type {id}")))
    }

    async fn put_content_type(
        &self,
        id: &str,
        definition: &ContentTypeDefinition,
        version: Option<u64>,
    ) -> Result<ContentTypeDefinition, ManagementError> {
        let mut state = self.state.lock().map_err(|_| lock_err())?;

        let current_version = match (state.content_types.get(id), version) {
            (Some(_), None) => {
                return Err(ManagementError::Conflict(format!("content type {id} exists")));
            }
            (None, Some(_)) => {
                return Err(ManagementError::NotFound(format!("content type {id}")));
            }
            (Some(existing), Some(v)) if existing.sys.version != v => {
                return Err(ManagementError::Conflict("VersionMismatch".to_string()));
            }
            (Some(existing), Some(_)) => existing.sys.version,
            (None, None) => 0,
        };

        let mut saved = definition.clone();
        for field in saved.fields.iter().filter(|f| f.deleted) {
            let omitted_when_published = state
                .published
                .get(id)
                .and_then(|p| p.field(&field.id))
                .is_some_and(|f| f.omitted);
            if !omitted_when_published {
                return Err(ManagementError::Conflict(format!(
                    "field {} must be omitted and published before deletion",
                    field.id
                )));
            }
        }
        saved.fields.retain(|f| !f.deleted);
        saved.sys = ResourceSys {
            id: id.to_string(),
            version: current_version + 1,
            published_version: state.content_types.get(id).and_then(|c| c.sys.published_version),
        };

        state.content_types.insert(id.to_string(), saved.clone());
        Ok(saved)
    }

    async fn activate_content_type(
        &self,
        id: &str,
        version: u64,
    ) -> Result<ContentTypeDefinition, ManagementError> {
        let mut state = self.state.lock().map_err(|_| lock_err())?;

        let Some(current) = state.content_types.get_mut(id) else {
            return Err(ManagementError::NotFound(format!("content type {id}")));
        };
        if current.sys.version != version {
            return Err(ManagementError::Conflict("VersionMismatch".to_string()));
        }
        current.sys.published_version = Some(version);
        current.sys.version += 1;
        let activated = current.clone();

        state.published.insert(id.to_string(), activated.clone());
        state
            .interfaces
            .entry(id.to_string())
            .or_insert_with(|| EditorInterface {
                sys: ResourceSys {
                    id: "default".to_string(),
                    version: 1,
                    published_version: None,
                },
                controls: activated
                    .fields
                    .iter()
                    .map(|f| EditorControl {
                        field_id: f.id.clone(),
                        widget_id: None,
                        widget_namespace: None,
                        settings: None,
                    })
                    .collect(),
            });

        Ok(activated)
    }

    async fn get_editor_interface(
        &self,
        content_type_id: &str,
    ) -> Result<EditorInterface, ManagementError> {
        let state = self.state.lock().map_err(|_| lock_err())?;
        state
            .interfaces
            .get(content_type_id)
            .cloned()
            .ok_or_else(|| ManagementError::NotFound(format!("editor interface {content_type_id}")))
    }

    async fn put_editor_interface(
        &self,
        content_type_id: &str,
        interface: &EditorInterface,
    ) -> Result<EditorInterface, ManagementError> {
        let mut state = self.state.lock().map_err(|_| lock_err())?;

        let Some(current) = state.interfaces.get_mut(content_type_id) else {
            return Err(ManagementError::NotFound(format!(
                "editor interface {content_type_id}"
            )));
        };
        if current.sys.version != interface.sys.version {
            return Err(ManagementError::Conflict("VersionMismatch".to_string()));
        }

        let version = current.sys.version + 1;
        *current = interface.clone();
        current.sys.version = version;
        Ok(current.clone())
    }

    async fn create_entry(
        &self,
        content_type_id: &str,
        fields: &EntryFields,
    ) -> Result<ResourceSys, ManagementError> {
        let mut state = self.state.lock().map_err(|_| lock_err())?;

        let attempt = state.creates;
        state.creates += 1;
        if state.fail_create_at == Some(attempt) {
            return Err(ManagementError::Api {
                status: 500,
                message: "injected failure".to_string(),
            });
        }

        let Some(content_type) = state.published.get(content_type_id) else {
            return Err(ManagementError::NotFound(format!(
                "content type {content_type_id}"
            )));
        };
        if let Some(unknown) = fields.keys().find(|k| content_type.field(k).is_none()) {
            return Err(ManagementError::Conflict(format!("unknown field {unknown}")));
        }
        if fields.values().any(|v| !matches!(v, Value::Object(_))) {
            return Err(ManagementError::Conflict("field values must be localized".to_string()));
        }

        state.next_entry += 1;
        let id = format!("entry-{}", state.next_entry);
        state.entries.insert(
            id.clone(),
            FakeEntry {
                content_type: content_type_id.to_string(),
                fields: fields.clone(),
                version: 1,
                published: false,
            },
        );

        Ok(ResourceSys {
            id,
            version: 1,
            published_version: None,
        })
    }

    async fn publish_entry(&self, id: &str, version: u64) -> Result<ResourceSys, ManagementError> {
        let mut state = self.state.lock().map_err(|_| lock_err())?;

        let Some(entry) = state.entries.get_mut(id) else {
            return Err(ManagementError::NotFound(format!("entry {id}")));
        };
        if entry.version != version {
            return Err(ManagementError::Conflict("VersionMismatch".to_string()));
        }
        entry.published = true;
        entry.version += 1;

        Ok(ResourceSys {
            id: id.to_string(),
            version: entry.version,
            published_version: Some(version),
        })
    }
}
