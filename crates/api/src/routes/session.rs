//! Route definitions for the visitor session.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{generation, session};
use crate::state::AppState;

/// Session routes mounted at `/session`.
///
/// ```text
/// POST  /start                 -> start_session
/// PATCH /{id}/gender           -> update_gender
/// POST  /{id}/upload-image     -> upload_image
/// POST  /{id}/generate-profile -> generate_profile
/// POST  /{id}/generate-talent  -> generate_talent
/// GET   /{id}/result           -> get_result
/// GET   /{id}                  -> get_by_uuid (download UUID)
/// ```
///
/// The upload route lifts axum's default body cap; the handler enforces
/// the configured maximum while streaming.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(session::start_session))
        .route("/{id}/gender", patch(session::update_gender))
        .route(
            "/{id}/upload-image",
            post(session::upload_image).layer(DefaultBodyLimit::disable()),
        )
        .route("/{id}/generate-profile", post(generation::generate_profile))
        .route("/{id}/generate-talent", post(generation::generate_talent))
        .route("/{id}/result", get(session::get_result))
        .route("/{id}", get(session::get_by_uuid))
}
