pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod print;
pub mod session;
pub mod tracking;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /session/start                     start session (POST)
/// /session/{id}/gender               set gender (PATCH)
/// /session/{id}/upload-image         upload photo, multipart `image` (POST)
/// /session/{id}/generate-profile     run profile generation (POST)
/// /session/{id}/generate-talent      run talent generation (POST)
/// /session/{id}/result               generated results (GET)
/// /session/{uuid}                    download-page lookup (GET)
///
/// /profiles                          profile catalog, ?gender= (GET)
/// /talents                           talent catalog, ?gender= (GET)
///
/// /print                             record a print job (POST)
///
/// /tracking/qr-scan                  download page opened (POST)
/// /tracking/download                 image downloaded (POST)
///
/// /dashboard/statistics              rollup, ?start_date=&end_date= (GET)
/// /dashboard/daily-stats             per-day breakdown, ?days= (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/session", session::router())
        .merge(catalog::router())
        .merge(print::router())
        .nest("/tracking", tracking::router())
        .nest("/dashboard", dashboard::router())
}
