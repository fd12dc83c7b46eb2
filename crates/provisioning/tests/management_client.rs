//! Management client tests against a mock CMS.

#![allow(clippy::unwrap_used)]

use coachsite_provisioning::management::{ContentTypeDefinition, EditorInterface};
use coachsite_provisioning::schema::{ContentTypeSchema, FieldKind, FieldSchema};
use coachsite_provisioning::{ManagementApi, ManagementClient, ManagementConfig, ManagementError};
use serde_json::{Map, Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_PATH: &str = "/spaces/space-1/environments/master";

fn client_for(server: &MockServer) -> ManagementClient {
    let uri = server.uri();
    let config = ManagementConfig::from_lookup(|key| match key {
        "CONTENTFUL_SPACE_ID" => Some("space-1".to_string()),
        "CONTENTFUL_MANAGEMENT_TOKEN" => Some("cfpat-test".to_string()),
        "CONTENTFUL_MANAGEMENT_URL" => Some(uri.clone()),
        _ => None,
    })
    .unwrap();
    ManagementClient::new(&config).unwrap()
}

fn content_type_response(id: &str, version: u64) -> Value {
    json!({
        "sys": {"id": id, "type": "ContentType", "version": version},
        "name": "Client",
        "displayField": "name",
        "fields": [{"id": "name", "name": "Name", "type": "Symbol", "required": true, "localized": false}]
    })
}

fn schema() -> ContentTypeSchema {
    ContentTypeSchema::new("client", "Client")
        .display_field("name")
        .field(FieldSchema::new("name", "Name", FieldKind::ShortText).required())
}

#[tokio::test]
async fn test_create_content_type_sends_definition() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{ENV_PATH}/content_types/client")))
        .and(header("authorization", "Bearer cfpat-test"))
        .and(header(
            "content-type",
            "application/vnd.contentful.management.v1+json",
        ))
        .and(body_json(json!({
            "name": "Client",
            "displayField": "name",
            "fields": [{
                "id": "name", "name": "Name", "type": "Symbol",
                "required": true, "localized": false, "validations": []
            }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(content_type_response("client", 1)))
        .expect(1)
        .mount(&server)
        .await;

    let saved = client_for(&server)
        .put_content_type("client", &schema().to_definition(), None)
        .await
        .unwrap();
    assert_eq!(saved.sys.version, 1);
}

#[tokio::test]
async fn test_activate_sends_version_header() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{ENV_PATH}/content_types/client/published")))
        .and(header("x-contentful-version", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(content_type_response("client", 2)))
        .expect(1)
        .mount(&server)
        .await;

    let active = client_for(&server)
        .activate_content_type("client", 1)
        .await
        .unwrap();
    assert_eq!(active.sys.version, 2);
}

#[tokio::test]
async fn test_error_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{ENV_PATH}/content_types/missing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "sys": {"type": "Error", "id": "NotFound"},
            "message": "The resource could not be found."
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{ENV_PATH}/content_types/client")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "sys": {"type": "Error", "id": "VersionMismatch"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{ENV_PATH}/content_types/client/editor_interface")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client.get_content_type("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "Not found: NotFound: The resource could not be found."
    );

    let err = client
        .put_content_type("client", &schema().to_definition(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ManagementError::Conflict(ref m) if m == "VersionMismatch"));

    let err = client.get_editor_interface("client").await.unwrap_err();
    assert!(matches!(err, ManagementError::Unauthorized));
}

#[tokio::test]
async fn test_editor_interface_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{ENV_PATH}/content_types/client/editor_interface")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": {"id": "default", "version": 4},
            "controls": [{"fieldId": "name", "widgetId": "singleLine", "widgetNamespace": "builtin"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{ENV_PATH}/content_types/client/editor_interface")))
        .and(header("x-contentful-version", "4"))
        .and(body_json(json!({
            "controls": [{"fieldId": "name", "widgetId": "slugEditor", "widgetNamespace": "builtin"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": {"id": "default", "version": 5},
            "controls": [{"fieldId": "name", "widgetId": "slugEditor", "widgetNamespace": "builtin"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut interface: EditorInterface = client.get_editor_interface("client").await.unwrap();
    interface.controls[0].widget_id = Some("slugEditor".to_string());

    let saved = client.put_editor_interface("client", &interface).await.unwrap();
    assert_eq!(saved.sys.version, 5);
}

#[tokio::test]
async fn test_create_and_publish_entry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ENV_PATH}/entries")))
        .and(header("x-contentful-content-type", "client"))
        .and(body_json(json!({"fields": {"name": {"en-US": "Acme"}}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sys": {"id": "5KsDBWseXY6QegucYAoacS", "type": "Entry", "version": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{ENV_PATH}/entries/5KsDBWseXY6QegucYAoacS/published")))
        .and(header("x-contentful-version", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": {"id": "5KsDBWseXY6QegucYAoacS", "type": "Entry", "version": 2, "publishedVersion": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut fields = Map::new();
    fields.insert("name".to_string(), json!({"en-US": "Acme"}));

    let created = client.create_entry("client", &fields).await.unwrap();
    let published = client.publish_entry(&created.id, created.version).await.unwrap();

    assert_eq!(published.version, 2);
    assert_eq!(published.published_version, Some(1));
}

#[tokio::test]
async fn test_unparsable_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{ENV_PATH}/content_types/client")))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"sys\":"))
        .mount(&server)
        .await;

    let result: Result<ContentTypeDefinition, _> =
        client_for(&server).get_content_type("client").await;
    assert!(matches!(result, Err(ManagementError::Parse(_))));
}
