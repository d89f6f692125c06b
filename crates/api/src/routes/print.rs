use axum::routing::post;
use axum::Router;

use crate::handlers::print;
use crate::state::AppState;

/// ```text
/// POST /print -> create_print
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/print", post(print::create_print))
}
