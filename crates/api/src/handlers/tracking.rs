//! Handlers for download-page analytics.

use axum::extract::State;
use axum::Json;
use kiosk_core::error::CoreError;
use kiosk_core::session::ImageKind;
use kiosk_core::types::DbId;
use kiosk_db::repositories::ParticipationHistoryRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::handlers::session::load_participation;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QrScanRequest {
    pub participation_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct QrScanResponse {
    pub participation_id: DbId,
    pub is_download_page_accessed: bool,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub participation_id: DbId,
    pub image_type: String,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub participation_id: DbId,
    pub image_type: ImageKind,
    pub download_count: i32,
}

/// POST /api/v1/tracking/qr-scan
pub async fn track_qr_scan(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<QrScanRequest>,
) -> AppResult<Json<ApiResponse<QrScanResponse>>> {
    let id = body.participation_id;
    load_participation(&state.pool, id).await?;

    ParticipationHistoryRepo::mark_page_accessed(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::session_not_found(id))?;
    tracing::debug!(participation_id = id, "QR scan tracked");

    Ok(ApiResponse::ok(
        QrScanResponse {
            participation_id: id,
            is_download_page_accessed: true,
        },
        "QR scan tracked successfully",
    ))
}

/// POST /api/v1/tracking/download
///
/// Increments the per-kind download counter by exactly one and returns
/// the updated value.
pub async fn track_download(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<DownloadRequest>,
) -> AppResult<Json<ApiResponse<DownloadResponse>>> {
    let kind = ImageKind::parse(&body.image_type)?;
    let id = body.participation_id;
    load_participation(&state.pool, id).await?;

    let download_count = ParticipationHistoryRepo::increment_download(&state.pool, id, kind)
        .await?
        .ok_or_else(|| CoreError::session_not_found(id))?;
    tracing::debug!(participation_id = id, kind = %kind, download_count, "Download tracked");

    Ok(ApiResponse::ok(
        DownloadResponse {
            participation_id: id,
            image_type: kind,
            download_count,
        },
        "Download tracked successfully",
    ))
}
