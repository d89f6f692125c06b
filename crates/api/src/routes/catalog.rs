use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// ```text
/// GET /profiles -> list_profiles
/// GET /talents  -> list_talents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profiles", get(catalog::list_profiles))
        .route("/talents", get(catalog::list_talents))
}
