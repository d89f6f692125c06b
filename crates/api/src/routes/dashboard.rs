use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Dashboard routes mounted at `/dashboard`.
///
/// ```text
/// GET /statistics  -> get_statistics
/// GET /daily-stats -> get_daily_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/statistics", get(dashboard::get_statistics))
        .route("/daily-stats", get(dashboard::get_daily_stats))
}
