//! End-to-end flows through the real router, stores, and partner client.
//!
//! The partner API is stood in for by a wiremock server; the archive writes
//! into a temporary directory and the relational store runs in memory.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use position_gateway::application::use_cases::{FetchPositionsUseCase, ReceiveWebhookUseCase};
use position_gateway::infrastructure::config::{ApiKey, PartnerSettings};
use position_gateway::infrastructure::http::{AppState, create_router};
use position_gateway::infrastructure::partner::PartnerHttpClient;
use position_gateway::infrastructure::persistence::{JsonArchive, PositionDatabase, PositionStore};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "gateway-test-key";

struct Gateway {
    app: Router,
    database: PositionDatabase,
    data_dir: tempfile::TempDir,
}

async fn gateway(partner_url: String) -> Gateway {
    let data_dir = tempfile::tempdir().unwrap();
    let archive = JsonArchive::open(data_dir.path()).unwrap();
    let database = PositionDatabase::open(":memory:").await.unwrap();
    let store = Arc::new(PositionStore::new(archive, database.clone()));

    let partner = Arc::new(
        PartnerHttpClient::new(&PartnerSettings {
            base_url: partner_url,
            timeout: Duration::from_secs(5),
            settle_delay: Duration::from_millis(10),
        })
        .unwrap(),
    );

    let state = AppState {
        receive_webhook: Arc::new(ReceiveWebhookUseCase::new(Arc::clone(&store))),
        fetch_positions: Arc::new(FetchPositionsUseCase::new(
            partner,
            store,
            Duration::from_millis(10),
        )),
        api_key: ApiKey::new(SECRET.to_string()),
        version: "test".to_string(),
    };

    Gateway {
        app: create_router(state),
        database,
        data_dir,
    }
}

fn webhook_request(key: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook/positions")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, key: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", key)
        .body(Body::empty())
        .unwrap()
}

fn post_request(uri: &str, key: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-api-key", key)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn archived_files(dir: &tempfile::TempDir) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[tokio::test]
async fn webhook_roundtrip_archives_payload() {
    let partner = MockServer::start().await;
    let gw = gateway(partner.uri()).await;

    let body = json!({
        "errors": [],
        "response": {"fileSize": 12, "url": "https://x/y"}
    });
    let response = gw
        .app
        .oneshot(webhook_request(Some(SECRET), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["status"], "success");

    let files = archived_files(&gw.data_dir);
    assert_eq!(files.len(), 1);

    let document: Value = serde_json::from_slice(&std::fs::read(&files[0]).unwrap()).unwrap();
    assert_eq!(document["response"]["fileSize"], 12);
    assert_eq!(document["response"]["url"], "https://x/y");
    assert!(document["received_at"].is_string());

    assert_eq!(gw.database.count().await.unwrap(), 1);
}

#[tokio::test]
async fn wrong_key_leaves_no_trace() {
    let partner = MockServer::start().await;
    let gw = gateway(partner.uri()).await;

    let body = json!({"response": {"fileSize": 12, "url": "https://x/y"}});
    let response = gw
        .app
        .oneshot(webhook_request(Some("wrong"), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error = body_json(response).await;
    assert_eq!(error["detail"], "invalid API key");

    assert!(archived_files(&gw.data_dir).is_empty());
    assert_eq!(gw.database.count().await.unwrap(), 0);
}

#[tokio::test]
async fn missing_key_is_bad_request() {
    let partner = MockServer::start().await;
    let gw = gateway(partner.uri()).await;

    let body = json!({"response": {"fileSize": 12, "url": "https://x/y"}});
    let response = gw.app.oneshot(webhook_request(None, &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(archived_files(&gw.data_dir).is_empty());
}

#[tokio::test]
async fn invalid_payload_is_rejected_before_storage() {
    let partner = MockServer::start().await;
    let gw = gateway(partner.uri()).await;

    let body = json!({"errors": [], "response": {"url": "https://x/y"}});
    let response = gw
        .app
        .oneshot(webhook_request(Some(SECRET), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(archived_files(&gw.data_dir).is_empty());
    assert_eq!(gw.database.count().await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_webhooks_in_one_second_produce_two_records() {
    let partner = MockServer::start().await;
    let gw = gateway(partner.uri()).await;

    let body = json!({"response": {"fileSize": 12, "url": "https://x/y"}});
    for _ in 0..2 {
        let response = gw
            .app
            .clone()
            .oneshot(webhook_request(Some(SECRET), &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(archived_files(&gw.data_dir).len(), 2);
    assert_eq!(gw.database.count().await.unwrap(), 2);
}

#[tokio::test]
async fn fetch_forwards_credential_and_archives_response() {
    let partner = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/positions"))
        .and(header("x-api-key", SECRET))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [],
            "response": {"fileSize": 99, "url": "https://reports/x"}
        })))
        .expect(1)
        .mount(&partner)
        .await;

    let gw = gateway(partner.uri()).await;
    let response = gw
        .app
        .oneshot(get_request("/positions/partner", SECRET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["status"], "success");
    assert_eq!(fetched["data"]["response"]["fileSize"], 99);

    assert_eq!(archived_files(&gw.data_dir).len(), 1);
    assert_eq!(gw.database.count().await.unwrap(), 1);
}

#[tokio::test]
async fn upstream_503_maps_to_server_error_without_storage() {
    let partner = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/positions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&partner)
        .await;

    let gw = gateway(partner.uri()).await;
    let response = gw
        .app
        .oneshot(get_request("/positions/partner", SECRET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(response).await;
    assert!(error["detail"].as_str().unwrap().contains("503"));

    assert!(archived_files(&gw.data_dir).is_empty());
    assert_eq!(gw.database.count().await.unwrap(), 0);
}

#[tokio::test]
async fn refresh_then_fetch_hits_both_resources() {
    let partner = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/positions/refresh"))
        .and(header("x-api-key", SECRET))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&partner)
        .await;
    Mock::given(method("GET"))
        .and(path("/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"fileSize": 5, "url": "https://reports/y"}
        })))
        .expect(1)
        .mount(&partner)
        .await;

    let gw = gateway(partner.uri()).await;
    let response = gw
        .app
        .oneshot(post_request("/positions/partner/refresh", SECRET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["data"]["response"]["fileSize"], 5);
    assert_eq!(gw.database.count().await.unwrap(), 1);
}

#[tokio::test]
async fn refresh_failure_skips_the_fetch() {
    let partner = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/positions/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&partner)
        .await;
    Mock::given(method("GET"))
        .and(path("/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&partner)
        .await;

    let gw = gateway(partner.uri()).await;
    let response = gw
        .app
        .oneshot(post_request("/positions/partner/refresh", SECRET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(archived_files(&gw.data_dir).is_empty());
}
