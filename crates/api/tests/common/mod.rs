#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use releasegate_core::combinator::MatchMode;
use releasegate_db::store::{Catalog, MemoryCatalog};
use releasegate_events::{ActivityPersistence, EventBus};
use serde_json::Value;
use tower::ServiceExt;

use releasegate_api::config::{LogFormat, ServerConfig, StorageBackend};
use releasegate_api::router::build_app_router;
use releasegate_api::state::AppState;

/// Build a test `ServerConfig` with the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        storage: StorageBackend::Memory,
        match_mode: MatchMode::Union,
        log_format: LogFormat::Pretty,
    }
}

/// Full router plus handles on the pieces tests inspect directly.
pub struct TestApp {
    pub router: Router,
    pub catalog: Arc<MemoryCatalog>,
    pub event_bus: Arc<EventBus>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Same middleware stack as production, with activity persistence
    /// running against the in-memory catalog.
    pub fn with_config(config: ServerConfig) -> Self {
        let catalog = Arc::new(MemoryCatalog::new());
        let event_bus = Arc::new(EventBus::default());
        tokio::spawn(ActivityPersistence::run(
            Arc::clone(&catalog),
            event_bus.subscribe(),
        ));

        let shared: Arc<dyn Catalog> = catalog.clone();
        let state = AppState {
            catalog: shared,
            config: Arc::new(config),
            event_bus: Arc::clone(&event_bus),
        };

        Self {
            router: build_app_router(state),
            catalog,
            event_bus,
        }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> Response {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.send(Method::DELETE, uri, None).await
    }

    /// POST a raw, possibly malformed, JSON body.
    pub async fn post_raw(&self, uri: &str, body: &'static str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Create an application and return its id.
    pub async fn create_application(&self, name: &str) -> i64 {
        let response = self
            .post_json("/api/v1/applications", serde_json::json!({ "name": name }))
            .await;
        body_json(response).await["data"]["id"].as_i64().unwrap()
    }

    /// Create a condition and return its id.
    pub async fn create_condition(&self, app_id: i64, rules: Value) -> i64 {
        let response = self
            .post_json(
                &format!("/api/v1/applications/{app_id}/conditions"),
                serde_json::json!({ "name": "condition", "rules": rules }),
            )
            .await;
        body_json(response).await["data"]["id"].as_i64().unwrap()
    }

    /// Create an active release and return its id.
    pub async fn create_release(&self, app_id: i64, code: &str, condition_ids: &[i64]) -> i64 {
        let response = self
            .post_json(
                &format!("/api/v1/applications/{app_id}/releases"),
                serde_json::json!({
                    "version_name": format!("{code}.0.0"),
                    "version_code": code,
                    "condition_ids": condition_ids
                }),
            )
            .await;
        body_json(response).await["data"]["id"].as_i64().unwrap()
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll `check` until it returns `Some`, for effects of background tasks.
pub async fn eventually<T, F, Fut>(mut check: F) -> T
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Option<T>>,
{
    for _ in 0..100 {
        if let Some(value) = check().await {
            return value;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 1s");
}
