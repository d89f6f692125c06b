//! Shared helpers for the API integration tests.
//!
//! Every test app gets its own temporary storage directories, a mock
//! face-fusion engine with no delay, and the production router built by
//! [`build_app_router`].

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use kiosk_api::config::{SchedulerConfig, ServerConfig, StorageConfig};
use kiosk_api::router::build_app_router;
use kiosk_api::state::AppState;
use kiosk_core::retention::RetentionPolicy;
use kiosk_core::upload::{DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE};
use kiosk_facefusion::{FaceFusionConfig, FaceFusionMode, FaceSwapper, MockEngine};

pub const PUBLIC_BASE_URL: &str = "http://kiosk.test";

/// Smallest byte sequence recognised as a PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Smallest byte sequence recognised as a JPEG.
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0";

/// Build a test `ServerConfig` whose storage lives under `root`.
pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        db_max_connections: 5,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        environment: "test".to_string(),
        public_base_url: PUBLIC_BASE_URL.to_string(),
        storage: StorageConfig {
            upload_dir: root.join("uploads"),
            output_dir: root.join("output"),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        },
        facefusion: FaceFusionConfig {
            mode: FaceFusionMode::Mock,
            mock_delay: Duration::ZERO,
            ..FaceFusionConfig::default()
        },
        scheduler: SchedulerConfig {
            enabled: false,
            policy: RetentionPolicy::default(),
        },
    }
}

/// A router plus the temporary directory backing its storage.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub storage: TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Write `bytes` to a file in the storage root and return its path.
    pub fn fixture(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.storage.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

/// Build the full application router with the mock engine.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, |_| {}, Arc::new(MockEngine::new(Duration::ZERO)))
}

/// Build the router after letting `customize` adjust the config, with an
/// explicit face-swap engine.
pub fn build_test_app_with(
    pool: PgPool,
    customize: impl FnOnce(&mut ServerConfig),
    face_swapper: Arc<dyn FaceSwapper>,
) -> TestApp {
    let storage = tempfile::tempdir().unwrap();
    let mut config = test_config(storage.path());
    customize(&mut config);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        face_swapper,
    };
    let router = build_app_router(state, &config);

    TestApp {
        router,
        config,
        storage,
    }
}

/// Point every catalog row at a real file so the mock engine can copy it.
pub async fn install_target_images(pool: &PgPool, app: &TestApp) -> PathBuf {
    let scene = app.fixture("scene.jpg", JPEG_BYTES);
    for table in ["target_profiles", "target_talents"] {
        sqlx::query(&format!("UPDATE {table} SET target_image_path = $1"))
            .bind(scene.to_string_lossy().into_owned())
            .execute(pool)
            .await
            .unwrap();
    }
    scene
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PATCH, uri, body).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

const BOUNDARY: &str = "kiosk-test-boundary";

/// POST a single-file multipart form.
pub async fn post_file(
    app: Router,
    uri: &str,
    field: &str,
    file_name: &str,
    bytes: &[u8],
) -> Response<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Session helpers
// ---------------------------------------------------------------------------

/// Start a consented session and return its id and download UUID.
pub async fn start_session(app: &TestApp) -> (i64, String) {
    let response = post_json(
        app.router(),
        "/api/v1/session/start",
        serde_json::json!({ "consent_agreed": true }),
    )
    .await;
    let json = body_json(response).await;
    (
        json["data"]["participation_id"].as_i64().unwrap(),
        json["data"]["download_page_uuid"].as_str().unwrap().to_string(),
    )
}

/// Start a session with gender and photo set, ready for generation.
pub async fn ready_session(app: &TestApp, gender: &str) -> i64 {
    let (id, _) = start_session(app).await;
    patch_json(
        app.router(),
        &format!("/api/v1/session/{id}/gender"),
        serde_json::json!({ "gender": gender }),
    )
    .await;
    post_file(
        app.router(),
        &format!("/api/v1/session/{id}/upload-image"),
        "image",
        "me.png",
        PNG_BYTES,
    )
    .await;
    id
}
