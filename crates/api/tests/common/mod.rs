use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use paddock_api::config::ServerConfig;
use paddock_api::routes;
use paddock_api::state::AppState;
use paddock_api::ws::WsManager;
use paddock_core::types::DbId;
use paddock_db::{MemoryStore, Store};
use paddock_events::NotificationHub;
use paddock_notify::{EngineConfig, NotificationService, Orchestrator, Triggers};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and keeps the in-process maintenance scheduler off so tests control
/// exactly when maintenance runs.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        maintenance_enabled: false,
        maintenance_interval_secs: 86_400,
    }
}

/// Build the full application router over an in-memory store.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. Returns the store and hub handles
/// so tests can seed data and observe published feed events.
pub fn build_test_app() -> (Router, Arc<MemoryStore>, Arc<NotificationHub>) {
    let memory = Arc::new(MemoryStore::new());
    let store: Arc<dyn Store> = memory.clone();

    let config = test_config();
    let engine_config = EngineConfig::default();
    let ws_manager = Arc::new(WsManager::new());
    let hub = Arc::new(NotificationHub::default());

    let service = NotificationService::new(Arc::clone(&store), Arc::clone(&hub), &engine_config);
    let triggers = Triggers::new(Arc::clone(&store), service.clone(), engine_config);
    let orchestrator = Orchestrator::new(Arc::clone(&store), triggers);

    let state = AppState {
        store,
        config: Arc::new(config),
        ws_manager,
        hub: Arc::clone(&hub),
        service,
        orchestrator,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    (router, memory, hub)
}

/// Send a GET request without an identity header.
#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request as the given user.
#[allow(dead_code)]
pub async fn get_as(app: Router, uri: &str, user_id: DbId) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("x-user-id", user_id.to_string())
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request as the given user, with an optional JSON body.
#[allow(dead_code)]
pub async fn post_as(app: Router, uri: &str, user_id: DbId, body: Option<Value>) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("x-user-id", user_id.to_string());
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PUT request as the given user, with a JSON body.
#[allow(dead_code)]
pub async fn put_as(app: Router, uri: &str, user_id: DbId, body: Value) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("x-user-id", user_id.to_string())
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request as the given user.
#[allow(dead_code)]
pub async fn delete_as(app: Router, uri: &str, user_id: DbId) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("x-user-id", user_id.to_string())
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Response body is not valid JSON")
}
