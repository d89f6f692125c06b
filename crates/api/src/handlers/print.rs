//! Handler for recording print jobs.

use axum::extract::State;
use axum::Json;
use kiosk_core::error::CoreError;
use kiosk_core::session::ImageKind;
use kiosk_core::types::{DbId, Timestamp};
use kiosk_db::repositories::PrintLogRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::handlers::session::load_participation;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PrintRequest {
    pub participation_id: DbId,
    pub image_type: String,
}

#[derive(Debug, Serialize)]
pub struct PrintResponse {
    pub print_log_id: DbId,
    pub participation_id: DbId,
    pub image_type: ImageKind,
    pub printed_at: Timestamp,
}

/// POST /api/v1/print
///
/// Only an already generated image can be printed. Each call appends a
/// print log; the history flag is simply set to true again on repeats.
pub async fn create_print(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PrintRequest>,
) -> AppResult<Json<ApiResponse<PrintResponse>>> {
    let kind = ImageKind::parse(&body.image_type)?;
    let participation = load_participation(&state.pool, body.participation_id).await?;

    if participation.generated_image_path(kind).is_none() {
        return Err(CoreError::ImageNotGenerated(kind).into());
    }

    let log = PrintLogRepo::create(&state.pool, participation.id, kind).await?;
    tracing::info!(
        participation_id = participation.id,
        print_log_id = log.id,
        kind = %kind,
        "Print job recorded"
    );

    Ok(ApiResponse::ok(
        PrintResponse {
            print_log_id: log.id,
            participation_id: participation.id,
            image_type: kind,
            printed_at: log.printed_at,
        },
        "Print job started successfully",
    ))
}
