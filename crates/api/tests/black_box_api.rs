use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use shelf_api::app::services::AppState;
use shelf_api::app::{build_app, build_router};
use shelf_api::config::{AppConfig, DEFAULT_BODY_LIMIT};
use shelf_core::ItemId;
use shelf_infra::{DEFAULT_IO_TIMEOUT, InMemorySecondaryStore, InMemoryStore, ItemService};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    _data_dir: Option<tempfile::TempDir>,
}

impl TestServer {
    /// File-backed server, same wiring as prod, on an ephemeral port.
    async fn spawn() -> Self {
        let data_dir = tempfile::tempdir().expect("failed to create temp dir");
        let config = AppConfig {
            data_path: data_dir.path().join("data.json"),
            expose_error_detail: true,
            ..AppConfig::default()
        };
        Self::serve(build_app(config), Some(data_dir)).await
    }

    /// In-memory server with an inspectable secondary mirror.
    async fn spawn_with_secondary() -> (Self, Arc<InMemorySecondaryStore>) {
        let secondary = Arc::new(InMemorySecondaryStore::new());
        let state = AppState {
            items: Arc::new(ItemService::new(
                Arc::new(InMemoryStore::new()),
                Some(secondary.clone()),
                DEFAULT_IO_TIMEOUT,
            )),
            expose_error_detail: true,
            secondary_configured: true,
        };
        let server = Self::serve(build_router(Arc::new(state), DEFAULT_BODY_LIMIT), None).await;
        (server, secondary)
    }

    async fn serve(app: axum::Router, data_dir: Option<tempfile::TempDir>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            _data_dir: data_dir,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn papaya_lifecycle_create_update_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create: numeric string price is accepted and normalized.
    let res = client
        .post(format!("{}/items", srv.base_url))
        .json(&json!({ "name": "Papaya", "price": "2500" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    id.parse::<ItemId>().expect("id is a hyphenated v4 uuid");
    assert_eq!(created["name"], "Papaya");
    assert_eq!(created["description"], "");
    assert_eq!(created["price"].as_f64().unwrap(), 2500.0);

    // Partial update: only price changes, name is untouched.
    let res = client
        .put(format!("{}/items/{}", srv.base_url, id))
        .json(&json!({ "price": "2750.5" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["price"].as_f64().unwrap(), 2750.5);
    assert_eq!(updated["name"], "Papaya");
    assert_eq!(updated["id"], created["id"]);

    // Delete returns the removed record.
    let res = client
        .delete(format!("{}/items/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["removed"]["id"].as_str().unwrap(), id);

    // And the item is gone.
    let res = client
        .get(format!("{}/items/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_starts_empty_and_reflects_creates() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/items", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let items: serde_json::Value = res.json().await.unwrap();
    assert_eq!(items, json!([]));

    for name in ["Papaya", "Mango"] {
        let res = client
            .post(format!("{}/items", srv.base_url))
            .json(&json!({ "name": name, "price": 1 }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let items: serde_json::Value = client
        .get(format!("{}/items", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<_> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Papaya", "Mango"]);
}

#[tokio::test]
async fn validation_failures_are_400_with_stable_codes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let cases = [
        (json!({ "name": "Jos3", "price": 1 }), "invalid_name"),
        (json!({ "name": "Papaya" }), "price_required"),
        (json!({ "name": "Papaya", "price": "abc" }), "price_not_numeric"),
        (json!({ "name": "Papaya", "price": "-1" }), "price_negative"),
        (json!({ "name": "Papaya", "price": 1e10 }), "price_too_large"),
    ];

    for (body, code) in cases {
        let res = client
            .post(format!("{}/items", srv.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: serde_json::Value = res.json().await.unwrap();
        assert_eq!(err["error"], code);
        assert!(err["message"].is_string());
    }
}

#[tokio::test]
async fn identifier_validation_and_unknown_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for bad in ["not-a-uuid", "f81d4fae-7dec-11d0-a765-00a0c91e6bf6"] {
        let res = client
            .get(format!("{}/items/{}", srv.base_url, bad))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: serde_json::Value = res.json().await.unwrap();
        assert_eq!(err["error"], "invalid_identifier");
    }

    let res = client
        .get(format!("{}/items/{}", srv.base_url, ItemId::new()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/items/{}", srv.base_url, ItemId::new()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_and_malformed_bodies() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/items", srv.base_url))
        .header("content-type", "application/json")
        .body(vec![b'a'; DEFAULT_BODY_LIMIT + 1])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let res = client
        .post(format!("{}/items", srv.base_url))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stored_markup_is_stripped_before_persisting() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/items", srv.base_url))
        .json(&json!({
            "name": "<b>Papaya</b>",
            "description": "rica <script>alert('x')</script>fruta",
            "price": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["name"], "Papaya");
    assert_eq!(created["description"], "rica fruta");
}

#[tokio::test]
async fn secondary_outage_does_not_change_responses() {
    let (srv, secondary) = TestServer::spawn_with_secondary().await;
    let client = reqwest::Client::new();

    // Healthy mirror first.
    let res = client
        .post(format!("{}/items", srv.base_url))
        .json(&json!({ "name": "Papaya", "price": "2500" }))
        .send()
        .await
        .unwrap();
    let healthy_status = res.status();
    let healthy: serde_json::Value = res.json().await.unwrap();

    // Now with the mirror down.
    secondary.set_failing(true);
    let res = client
        .post(format!("{}/items", srv.base_url))
        .json(&json!({ "name": "Papaya", "price": "2500" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), healthy_status);
    let degraded: serde_json::Value = res.json().await.unwrap();

    // Same body shape modulo the generated id.
    assert_eq!(degraded["name"], healthy["name"]);
    assert_eq!(degraded["description"], healthy["description"]);
    assert_eq!(degraded["price"], healthy["price"]);

    let id = degraded["id"].as_str().unwrap();
    let res = client
        .put(format!("{}/items/{}", srv.base_url, id))
        .json(&json!({ "price": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!("{}/items/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn health_and_index_respond() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["secondary_store"], "not configured");

    let res = client.get(&srv.base_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ok"], true);
}
