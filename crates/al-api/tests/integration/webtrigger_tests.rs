//! Web-trigger endpoint integration tests.

use al_connectors::assets::mock::MockCall;
use al_connectors::MockAssetsConnector;
use serde_json::json;
use std::sync::Arc;

use super::common::{create_router, create_test_router, send_trigger, trigger_payload};

#[tokio::test]
async fn test_create_assets_creates_schema_and_asset() {
    let connector = Arc::new(MockAssetsConnector::new("mock"));
    let app = create_router(connector.clone());
    let body = r#"{"objectType":"Servers","attributes":{"Name":"web-1","Owner":"ops"}}"#;

    let envelope = send_trigger(app, "/webtrigger/create-assets", &trigger_payload(body)).await;

    assert_eq!(
        envelope.payload(),
        Some(json!({"objectType": "Servers", "attributes": {"Name": "web-1", "Owner": "ops"}}))
    );
    assert_eq!(envelope.headers["Content-Type"], vec!["application/json"]);
    assert!(envelope.headers["X-Request-Id"][0].starts_with("rnd-"));

    let types = connector.object_types("11").await;
    assert_eq!(types.len(), 1);
    assert_eq!(connector.attributes(&types[0].id).await.len(), 2);
    assert_eq!(connector.assets().await.len(), 1);
}

#[tokio::test]
async fn test_create_assets_supersedes_previous_asset() {
    let (app, connector) = create_test_router().await;
    let body = r#"{"objectType":"network assets","attributes":{"Name":"core-switch-2","id":"301"}}"#;

    let envelope = send_trigger(app, "/webtrigger/create-assets", &trigger_payload(body)).await;

    assert!(!envelope.is_failure());
    let deletes: Vec<MockCall> = connector
        .calls()
        .await
        .into_iter()
        .filter(|c| matches!(c, MockCall::DeleteAsset(_)))
        .collect();
    assert_eq!(deletes, vec![MockCall::DeleteAsset("301".to_string())]);
    assert!(connector.assets().await.iter().all(|a| a.id != "301"));
}

#[tokio::test]
async fn test_create_assets_echoes_parsed_body() {
    let connector = Arc::new(MockAssetsConnector::new("mock"));
    let app = create_router(connector.clone());
    let body = r#"{"objectType":"Servers","attributes":{"Name":"web-1","Notes":null},"source":"jira"}"#;

    let envelope = send_trigger(app, "/webtrigger/create-assets", &trigger_payload(body)).await;

    assert_eq!(
        envelope.payload(),
        Some(json!({
            "objectType": "Servers",
            "attributes": {"Name": "web-1", "Notes": null},
            "source": "jira"
        }))
    );
    assert_eq!(connector.assets().await[0].attributes.len(), 1);
}

#[tokio::test]
async fn test_create_assets_legacy_body() {
    let connector = Arc::new(MockAssetsConnector::new("mock"));
    let app = create_router(connector.clone());
    let legacy_text = r#"{"objectType": Printer, "attributes": {Model=LJ4, Floor=2}}"#;
    let legacy = serde_json::to_string(legacy_text).unwrap();

    let envelope =
        send_trigger(app, "/webtrigger/create-assets", &trigger_payload(&legacy)).await;

    assert_eq!(
        envelope.payload(),
        Some(json!({"objectType": "Printer", "attributes": {"Model": "LJ4", "Floor": "2"}}))
    );
}

#[tokio::test]
async fn test_create_assets_invalid_body_is_null() {
    let connector = Arc::new(MockAssetsConnector::new("mock"));
    let app = create_router(connector.clone());

    let envelope =
        send_trigger(app, "/webtrigger/create-assets", &trigger_payload("{broken")).await;

    assert_eq!(envelope.body, "{\"body\":null}");
    assert!(connector.calls().await.is_empty());
}

#[tokio::test]
async fn test_create_assets_object_type_failure_is_null() {
    let connector = Arc::new(MockAssetsConnector::new("mock"));
    connector.fail_object_type_creation(true);
    let app = create_router(connector.clone());
    let body = r#"{"objectType":"Servers","attributes":{"Name":"web-1"}}"#;

    let envelope = send_trigger(app, "/webtrigger/create-assets", &trigger_payload(body)).await;

    assert!(envelope.is_failure());
    assert!(connector.assets().await.is_empty());
}

#[tokio::test]
async fn test_create_assets_non_json_request_is_null() {
    let (app, _) = create_test_router().await;
    let envelope = send_trigger(app, "/webtrigger/create-assets", "plain text").await;
    assert!(envelope.is_failure());
}

#[tokio::test]
async fn test_list_assets() {
    let (app, _) = create_test_router().await;

    let envelope = send_trigger(app, "/webtrigger/list-assets", "{}").await;

    assert_eq!(
        envelope.payload(),
        Some(json!({
            "networkAssets": [
                {"IP": "10.1.0.1", "Name": "core-switch", "id": "301"},
                {"Name": "edge-router", "id": "302"}
            ]
        }))
    );
}

#[tokio::test]
async fn test_list_assets_query_failure_is_null() {
    let (app, connector) = create_test_router().await;
    connector.fail_listing(true);

    let envelope = send_trigger(app, "/webtrigger/list-assets", "{}").await;
    assert!(envelope.is_failure());
}

#[tokio::test]
async fn test_knowledge_base() {
    let (app, _) = create_test_router().await;

    let envelope = send_trigger(app, "/webtrigger/knowledge-base", "{}").await;

    assert_eq!(
        envelope.payload(),
        Some(json!([
            {"IP": "10.1.0.1", "Name": "core-switch"},
            {"Name": "edge-router"}
        ]))
    );
}

#[tokio::test]
async fn test_ping_returns_number() {
    let (app, _) = create_test_router().await;

    let envelope = send_trigger(app, "/webtrigger/ping", "").await;

    assert!(envelope.payload().and_then(|p| p.as_f64()).is_some());
}
