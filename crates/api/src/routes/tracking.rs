use axum::routing::post;
use axum::Router;

use crate::handlers::tracking;
use crate::state::AppState;

/// Tracking routes mounted at `/tracking`.
///
/// ```text
/// POST /qr-scan  -> track_qr_scan
/// POST /download -> track_download
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/qr-scan", post(tracking::track_qr_scan))
        .route("/download", post(tracking::track_download))
}
