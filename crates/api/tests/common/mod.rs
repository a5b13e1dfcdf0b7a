#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use artlab_api::config::{BackendConfig, ServerConfig};
use artlab_api::probe::FixedDurationProbe;
use artlab_api::routes;
use artlab_api::state::AppState;
use artlab_db::memory::MemoryBackend;
use artlab_db::Backend;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
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

/// Duration every probed video reports unless a test says otherwise.
pub const DEFAULT_VIDEO_SECS: f64 = 30.0;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 64 * 1024 * 1024,
        backend: BackendConfig::Memory {
            bucket: "lab-upload".to_string(),
        },
        ffprobe_path: "ffprobe".to_string(),
    }
}

/// The router plus a handle on the in-memory platform behind it.
pub struct TestApp {
    pub app: Router,
    pub memory: Arc<MemoryBackend>,
}

/// Build the full application router over a fresh in-memory platform.
pub fn build_test_app() -> TestApp {
    build_test_app_with_probe(FixedDurationProbe(Some(DEFAULT_VIDEO_SECS)))
}

/// Build the full application router with all middleware layers, using the
/// given video probe.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (body limit, CORS, request ID,
/// timeout, tracing, panic recovery) that production uses.
pub fn build_test_app_with_probe(probe: FixedDurationProbe) -> TestApp {
    let config = test_config();
    let memory = Arc::new(MemoryBackend::new("lab-upload"));

    let state = AppState {
        backend: Backend::from_shared(memory.clone()),
        config: Arc::new(config.clone()),
        probe: Arc::new(probe),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
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

    TestApp { app, memory }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn send_form(app: &Router, method: Method, uri: &str, form: MultipartForm) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, MultipartForm::content_type())
        .body(Body::from(form.finish()))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "artlab-test-boundary-7MA4YWxkTrZu0gW";

/// Builder for `multipart/form-data` request bodies.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A create form with every required field filled in.
pub fn artist_form(name: &str, project_name: &str) -> MultipartForm {
    MultipartForm::default()
        .text("name", name)
        .text("project_name", project_name)
        .text("project_description", "A debut record")
        .text("campaign_statement", "Heard everywhere")
        .text("current_stage", "Ideation")
        .text("values", "honesty, craft")
        .text("goals", "tour, sync")
        .text("brand", "neon")
        .text("session_summary", "Kickoff call")
        .text("themes", "night, city")
}

/// Create an artist through the API and return the response `data`.
pub async fn create_artist(app: &Router, form: MultipartForm) -> Value {
    let response = send_form(app, Method::POST, "/api/v1/admin/artists", form).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
