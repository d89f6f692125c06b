//! Handlers that run face fusion for a session.
//!
//! Both endpoints share [`generate`]: pick a random gender-matched target
//! of the requested kind, swap the visitor's face onto it, and record the
//! result on the participation and its history row.

use std::path::Path;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use kiosk_core::error::CoreError;
use kiosk_core::selection;
use kiosk_core::session::ImageKind;
use kiosk_core::types::DbId;
use kiosk_core::upload;
use kiosk_db::repositories::{ParticipationRepo, TargetRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::ApiPath;
use crate::handlers::session::load_participation;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub participation_id: DbId,
    pub selected_target_id: DbId,
    pub selected_target_name: String,
    pub generated_image_path: String,
    pub image_url: String,
}

/// POST /api/v1/session/{id}/generate-profile
pub async fn generate_profile(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<GenerationResponse>>> {
    let result = generate(&state, id, ImageKind::Profile).await?;
    Ok(ApiResponse::ok(result, "Profile image generated successfully"))
}

/// POST /api/v1/session/{id}/generate-talent
pub async fn generate_talent(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<GenerationResponse>>> {
    let result = generate(&state, id, ImageKind::Talent).await?;
    Ok(ApiResponse::ok(result, "Talent image generated successfully"))
}

async fn generate(state: &AppState, id: DbId, kind: ImageKind) -> AppResult<GenerationResponse> {
    let participation = load_participation(&state.pool, id).await?;

    let (Some(original), Some(gender)) = (
        participation.original_image_path.as_deref(),
        participation.gender(),
    ) else {
        return Err(CoreError::GenerationFailed("Original image or gender not set".into()).into());
    };

    let targets = TargetRepo::list(&state.pool, kind, Some(gender)).await?;
    let target = selection::choose_target(&targets).ok_or(CoreError::NoTargets { kind, gender })?;

    let file_name = upload::output_file_name(kind, Utc::now());
    let output = state.config.storage.output_dir.join(&file_name);

    tracing::info!(
        participation_id = id,
        kind = %kind,
        target = %target.name,
        engine = state.face_swapper.mode().as_str(),
        "Generating composite"
    );
    state
        .face_swapper
        .generate(
            Path::new(original),
            Path::new(&target.target_image_path),
            &output,
        )
        .await
        .map_err(|e| CoreError::GenerationFailed(e.to_string()))?;

    let generated_image_path = output.to_string_lossy().into_owned();
    ParticipationRepo::record_generation(&state.pool, id, kind, target, &generated_image_path)
        .await?
        .ok_or_else(|| CoreError::session_not_found(id))?;

    Ok(GenerationResponse {
        participation_id: id,
        selected_target_id: target.id,
        selected_target_name: target.name.clone(),
        generated_image_path,
        image_url: upload::image_url(&state.config.public_base_url, &file_name),
    })
}
