//! Integration tests for the coaching site CMS layer.
//!
//! [`MockCms`] runs a small stateful imitation of the CMS on a local
//! `wiremock` server: the management endpoints used by migrations and
//! seeders, and the delivery `entries` endpoint used by the site. Tests can
//! then migrate, seed and read back over real HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coachsite-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use coachsite_content::CmsConfig;
use coachsite_provisioning::ManagementConfig;
use serde_json::{Map, Value, json};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const SPACE_ID: &str = "space-e2e";
pub const LOCALE: &str = "en-US";

const ENV_PREFIX: &str = "/spaces/space-e2e/environments/master";
const DELIVERY_TOKEN: &str = "delivery-e2e";
const MANAGEMENT_TOKEN: &str = "cfpat-e2e";

#[derive(Debug, Clone)]
struct StoredEntry {
    id: String,
    content_type: String,
    fields: Map<String, Value>,
    version: u64,
    published: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CmsState {
    content_types: HashMap<String, Value>,
    published_types: HashMap<String, Value>,
    interfaces: HashMap<String, Value>,
    entries: Vec<StoredEntry>,
}

/// In-memory CMS behind a mock HTTP server.
pub struct MockCms {
    server: MockServer,
    state: Arc<Mutex<CmsState>>,
}

impl MockCms {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let state = Arc::new(Mutex::new(CmsState::default()));

        Mock::given(any())
            .respond_with(CmsResponder {
                state: Arc::clone(&state),
            })
            .mount(&server)
            .await;

        Self { server, state }
    }

    /// Read-path configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the server URI is rejected, which would be a test setup bug.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn cms_config(&self) -> CmsConfig {
        let uri = self.server.uri();
        CmsConfig::from_lookup(|key| match key {
            "CONTENTFUL_SPACE_ID" => Some(SPACE_ID.to_string()),
            "CONTENTFUL_ACCESS_TOKEN" => Some(DELIVERY_TOKEN.to_string()),
            "CONTENTFUL_DELIVERY_URL" => Some(uri.clone()),
            _ => None,
        })
        .unwrap()
    }

    /// Write-path configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the server URI is rejected, which would be a test setup bug.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn management_config(&self) -> ManagementConfig {
        let uri = self.server.uri();
        ManagementConfig::from_lookup(|key| match key {
            "CONTENTFUL_SPACE_ID" => Some(SPACE_ID.to_string()),
            "CONTENTFUL_MANAGEMENT_TOKEN" => Some(MANAGEMENT_TOKEN.to_string()),
            "CONTENTFUL_MANAGEMENT_URL" => Some(uri.clone()),
            _ => None,
        })
        .unwrap()
    }

    /// Number of stored entries of a content type, drafts included.
    #[must_use]
    pub fn entry_count(&self, content_type: &str) -> usize {
        lock(&self.state)
            .entries
            .iter()
            .filter(|e| e.content_type == content_type)
            .count()
    }

    /// Field ids of the active version of a content type.
    #[must_use]
    pub fn published_fields(&self, content_type: &str) -> Vec<String> {
        lock(&self.state)
            .published_types
            .get(content_type)
            .and_then(|t| t["fields"].as_array().cloned())
            .unwrap_or_default()
            .iter()
            .filter_map(|f| f["id"].as_str().map(ToString::to_string))
            .collect()
    }
}

fn lock(state: &Mutex<CmsState>) -> MutexGuard<'_, CmsState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn error(status: u16, id: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "sys": {"type": "Error", "id": id},
        "message": format!("{id} (mock CMS)")
    }))
}

fn version_header(request: &Request) -> Option<u64> {
    request
        .headers
        .get("x-contentful-version")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

struct CmsResponder {
    state: Arc<Mutex<CmsState>>,
}

impl Respond for CmsResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Some(rest) = request.url.path().strip_prefix(ENV_PREFIX) else {
            return error(404, "NotFound");
        };
        let segments: Vec<&str> = rest.trim_matches('/').split('/').collect();
        let auth = request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let mut state = lock(&self.state);

        match (request.method.as_str(), segments.as_slice()) {
            ("GET", ["entries"]) if auth == format!("Bearer {DELIVERY_TOKEN}") => {
                deliver(&state, request)
            }
            _ if auth != format!("Bearer {MANAGEMENT_TOKEN}") => error(401, "AccessTokenInvalid"),
            ("GET", ["content_types", id]) => state
                .content_types
                .get(*id)
                .map_or_else(|| error(404, "NotFound"), |t| ok(t.clone())),
            ("PUT", ["content_types", id]) => put_content_type(&mut state, id, request),
            ("PUT", ["content_types", id, "published"]) => activate(&mut state, id, request),
            ("GET", ["content_types", id, "editor_interface"]) => state
                .interfaces
                .get(*id)
                .map_or_else(|| error(404, "NotFound"), |i| ok(i.clone())),
            ("PUT", ["content_types", id, "editor_interface"]) => {
                put_interface(&mut state, id, request)
            }
            ("POST", ["entries"]) => create_entry(&mut state, request),
            ("PUT", ["entries", id, "published"]) => publish_entry(&mut state, id, request),
            _ => error(404, "NotFound"),
        }
    }
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

fn with_sys(mut body: Value, id: &str, version: u64, published: Option<u64>) -> Value {
    body["sys"] = json!({"id": id, "version": version, "publishedVersion": published});
    body
}

fn put_content_type(state: &mut CmsState, id: &str, request: &Request) -> ResponseTemplate {
    let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
        return error(400, "BadRequest");
    };

    let existing = state.content_types.get(id);
    let (version, published) = match (existing, version_header(request)) {
        (Some(_), None) => return error(409, "VersionMismatch"),
        (None, Some(_)) => return error(404, "NotFound"),
        (Some(t), Some(v)) if t["sys"]["version"].as_u64() != Some(v) => {
            return error(409, "VersionMismatch");
        }
        (Some(t), Some(v)) => (v + 1, t["sys"]["publishedVersion"].as_u64()),
        (None, None) => (1, None),
    };

    if let Some(fields) = body["fields"].as_array_mut() {
        for field in fields.iter().filter(|f| f["deleted"] == true) {
            let omitted = state
                .published_types
                .get(id)
                .and_then(|p| p["fields"].as_array())
                .and_then(|fs| fs.iter().find(|f2| f2["id"] == field["id"]))
                .is_some_and(|f2| f2["omitted"] == true);
            if !omitted {
                return error(422, "ValidationFailed");
            }
        }
        fields.retain(|f| f["deleted"] != true);
    }

    let saved = with_sys(body, id, version, published);
    state.content_types.insert(id.to_string(), saved.clone());
    ResponseTemplate::new(if version == 1 { 201 } else { 200 }).set_body_json(saved)
}

fn activate(state: &mut CmsState, id: &str, request: &Request) -> ResponseTemplate {
    let Some(current) = state.content_types.get(id).cloned() else {
        return error(404, "NotFound");
    };
    let Some(version) = version_header(request) else {
        return error(400, "BadRequest");
    };
    if current["sys"]["version"].as_u64() != Some(version) {
        return error(409, "VersionMismatch");
    }

    let active = with_sys(current, id, version + 1, Some(version));
    state.content_types.insert(id.to_string(), active.clone());
    state.published_types.insert(id.to_string(), active.clone());

    let controls: Vec<Value> = active["fields"]
        .as_array()
        .map(|fields| fields.iter().map(|f| json!({"fieldId": f["id"]})).collect())
        .unwrap_or_default();
    state
        .interfaces
        .entry(id.to_string())
        .or_insert_with(|| json!({"sys": {"id": "default", "version": 1}, "controls": controls}));

    ok(active)
}

fn put_interface(state: &mut CmsState, id: &str, request: &Request) -> ResponseTemplate {
    let Some(current) = state.interfaces.get(id) else {
        return error(404, "NotFound");
    };
    if current["sys"]["version"].as_u64() != version_header(request) {
        return error(409, "VersionMismatch");
    }
    let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
        return error(400, "BadRequest");
    };

    let version = version_header(request).unwrap_or_default() + 1;
    let saved = with_sys(body, "default", version, None);
    state.interfaces.insert(id.to_string(), saved.clone());
    ok(saved)
}

fn create_entry(state: &mut CmsState, request: &Request) -> ResponseTemplate {
    let content_type = request
        .headers
        .get("x-contentful-content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !state.published_types.contains_key(&content_type) {
        return error(422, "UnknownContentType");
    }
    let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
        return error(400, "BadRequest");
    };

    let sequence = state.entries.len();
    let id = format!("entry{sequence:04}");
    let base = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default();

    state.entries.push(StoredEntry {
        id: id.clone(),
        content_type,
        fields: body["fields"].as_object().cloned().unwrap_or_default(),
        version: 1,
        published: false,
        created_at: base + Duration::minutes(i64::try_from(sequence).unwrap_or_default()),
    });

    ResponseTemplate::new(201).set_body_json(json!({"sys": {"id": id, "type": "Entry", "version": 1}}))
}

fn publish_entry(state: &mut CmsState, id: &str, request: &Request) -> ResponseTemplate {
    let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) else {
        return error(404, "NotFound");
    };
    if version_header(request) != Some(entry.version) {
        return error(409, "VersionMismatch");
    }
    entry.published = true;
    entry.version += 1;

    ok(json!({"sys": {"id": id, "type": "Entry", "version": entry.version, "publishedVersion": entry.version - 1}}))
}

/// Delivery view of an entry: sys plus single-locale fields.
fn delivered(entry: &StoredEntry) -> Value {
    let fields: Map<String, Value> = entry
        .fields
        .iter()
        .filter_map(|(k, v)| v.get(LOCALE).map(|v| (k.clone(), v.clone())))
        .collect();
    json!({
        "sys": {
            "id": entry.id,
            "type": "Entry",
            "createdAt": entry.created_at.to_rfc3339(),
            "contentType": {"sys": {"type": "Link", "linkType": "ContentType", "id": entry.content_type}}
        },
        "fields": fields
    })
}

/// Value at `sys.x` or `fields.x`.
fn lookup<'a>(entry: &'a Value, path: &str) -> Option<&'a Value> {
    let (scope, name) = path.split_once('.')?;
    entry.get(scope)?.get(name).filter(|v| !v.is_null())
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn deliver(state: &CmsState, request: &Request) -> ResponseTemplate {
    let params: HashMap<String, String> = request.url.query_pairs().into_owned().collect();

    let mut items: Vec<Value> = state
        .entries
        .iter()
        .filter(|e| e.published)
        .map(delivered)
        .collect();

    if let Some(content_type) = params.get("content_type") {
        if !state.published_types.contains_key(content_type) {
            return error(400, "InvalidQuery");
        }
        items.retain(|e| e["sys"]["contentType"]["sys"]["id"] == content_type.as_str());
    }

    for (key, expected) in &params {
        if let Some(path) = key.strip_suffix("[gte]") {
            items.retain(|e| {
                lookup(e, path)
                    .and_then(Value::as_str)
                    .is_some_and(|v| v >= expected.as_str())
            });
        } else if key.starts_with("fields.") || key == "sys.id" {
            items.retain(|e| {
                lookup(e, key).is_some_and(|v| match v {
                    Value::String(s) => s == expected,
                    other => other.to_string() == *expected,
                })
            });
        }
    }

    if let Some(order) = params.get("order") {
        let (descending, path) = order
            .strip_prefix('-')
            .map_or((false, order.as_str()), |p| (true, p));
        items.sort_by(|a, b| {
            let ordering = compare(lookup(a, path), lookup(b, path));
            if descending { ordering.reverse() } else { ordering }
        });
    }

    let total = items.len();
    let limit = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(100);
    items.truncate(limit);

    ok(json!({
        "sys": {"type": "Array"},
        "total": total,
        "skip": 0,
        "limit": limit,
        "items": items
    }))
}
