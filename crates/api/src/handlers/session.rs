//! Handlers for the visitor session lifecycle.
//!
//! A session starts with consent, then gains a gender and an uploaded
//! photo before generation. Result lookups are by internal id (kiosk
//! screens) or by public download UUID (QR download page).

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use kiosk_core::error::CoreError;
use kiosk_core::session::{self, Gender, ImageKind};
use kiosk_core::types::DbId;
use kiosk_core::upload::{self, ORIGINAL_PREFIX};
use kiosk_db::models::participation::Participation;
use kiosk_db::repositories::{ParticipationRepo, TargetRepo};
use kiosk_db::DbPool;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Multipart field carrying the visitor's photo.
const IMAGE_FIELD: &str = "image";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub consent_agreed: bool,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub participation_id: DbId,
    pub download_page_uuid: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGenderRequest {
    pub gender: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateGenderResponse {
    pub participation_id: DbId,
    pub gender: Gender,
}

#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub participation_id: DbId,
    pub original_image_path: String,
}

/// One generated composite as shown on the result screen.
#[derive(Debug, Serialize)]
pub struct GeneratedResult {
    pub selected_name: Option<String>,
    pub generated_image_path: String,
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResultResponse {
    pub participation_id: DbId,
    pub gender: Option<Gender>,
    pub download_page_uuid: Uuid,
    pub profile_result: Option<GeneratedResult>,
    pub talent_result: Option<GeneratedResult>,
}

#[derive(Debug, Serialize)]
pub struct DownloadPageResponse {
    pub participation_id: DbId,
    pub gender: Option<Gender>,
    pub generated_profile_image_path: Option<String>,
    pub generated_talent_image_path: Option<String>,
    pub profile_image_url: Option<String>,
    pub talent_image_url: Option<String>,
    pub selected_profile_name: Option<String>,
    pub selected_talent_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load a participation or fail with `SESSION_NOT_FOUND`.
pub(crate) async fn load_participation(pool: &DbPool, id: DbId) -> AppResult<Participation> {
    ParticipationRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::session_not_found(id).into())
}

/// Display name of the target chosen for `kind`, if one is still recorded.
async fn selected_name(
    pool: &DbPool,
    participation: &Participation,
    kind: ImageKind,
) -> AppResult<Option<String>> {
    let Some(target_id) = participation.selected_target_id(kind) else {
        return Ok(None);
    };
    let target = TargetRepo::find_by_id(pool, kind, target_id).await?;
    Ok(target.map(|t| t.name))
}

fn public_url(state: &AppState, path: &str) -> String {
    upload::image_url(&state.config.public_base_url, upload::file_name_of(path))
}

async fn generated_result(
    state: &AppState,
    participation: &Participation,
    kind: ImageKind,
) -> AppResult<Option<GeneratedResult>> {
    let Some(path) = participation.generated_image_path(kind) else {
        return Ok(None);
    };
    Ok(Some(GeneratedResult {
        selected_name: selected_name(&state.pool, participation, kind).await?,
        generated_image_path: path.to_string(),
        image_url: public_url(state, path),
    }))
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/session/start
///
/// Creates the participation and its history row. Consent is mandatory.
pub async fn start_session(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<StartSessionRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<StartSessionResponse>>)> {
    session::require_consent(body.consent_agreed)?;

    let participation = ParticipationRepo::create(&state.pool, true).await?;
    tracing::info!(participation_id = participation.id, "Session started");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            StartSessionResponse {
                participation_id: participation.id,
                download_page_uuid: participation.download_uuid,
            },
            "Session started successfully",
        ),
    ))
}

/// PATCH /api/v1/session/{id}/gender
pub async fn update_gender(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(body): ApiJson<UpdateGenderRequest>,
) -> AppResult<Json<ApiResponse<UpdateGenderResponse>>> {
    let gender = Gender::parse(&body.gender)?;

    ParticipationRepo::set_gender(&state.pool, id, gender)
        .await?
        .ok_or_else(|| CoreError::session_not_found(id))?;
    tracing::info!(participation_id = id, gender = %gender, "Gender updated");

    Ok(ApiResponse::ok(
        UpdateGenderResponse {
            participation_id: id,
            gender,
        },
        "Gender updated successfully",
    ))
}

/// POST /api/v1/session/{id}/upload-image
///
/// Multipart upload with the photo in the `image` field. The extension,
/// size and sniffed content are validated before the file is written.
pub async fn upload_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ApiResponse<UploadImageResponse>>> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    load_participation(&state.pool, id).await?;

    let storage = &state.config.storage;
    let mut received: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let ext = upload::validate_extension(field.file_name(), &storage.allowed_extensions)?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            upload::validate_size((data.len() + chunk.len()) as u64, storage.max_file_size)?;
            data.extend_from_slice(&chunk);
        }
        received = Some((ext, data));
        break;
    }

    let (ext, data) = received
        .ok_or_else(|| AppError::BadRequest(format!("Missing required '{IMAGE_FIELD}' field")))?;
    upload::validate_content(&data, &storage.allowed_extensions)?;

    let file_name = upload::stored_file_name(ORIGINAL_PREFIX, &ext, Utc::now());
    let path = storage.upload_dir.join(&file_name);
    tokio::fs::create_dir_all(&storage.upload_dir)
        .await
        .map_err(|e| CoreError::FileUpload(e.to_string()))?;
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| CoreError::FileUpload(e.to_string()))?;

    let original_image_path = path.to_string_lossy().into_owned();
    ParticipationRepo::set_original_image(&state.pool, id, &original_image_path)
        .await?
        .ok_or_else(|| CoreError::session_not_found(id))?;
    tracing::info!(
        participation_id = id,
        bytes = data.len(),
        path = %original_image_path,
        "Original image stored"
    );

    Ok(ApiResponse::ok(
        UploadImageResponse {
            participation_id: id,
            original_image_path,
        },
        "Image uploaded successfully",
    ))
}

/// GET /api/v1/session/{id}/result
pub async fn get_result(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<SessionResultResponse>>> {
    let participation = load_participation(&state.pool, id).await?;

    let profile_result = generated_result(&state, &participation, ImageKind::Profile).await?;
    let talent_result = generated_result(&state, &participation, ImageKind::Talent).await?;

    Ok(ApiResponse::ok(
        SessionResultResponse {
            participation_id: participation.id,
            gender: participation.gender(),
            download_page_uuid: participation.download_uuid,
            profile_result,
            talent_result,
        },
        "Result retrieved successfully",
    ))
}

/// GET /api/v1/session/{uuid}
///
/// Public download-page lookup. A malformed UUID is treated as unknown.
pub async fn get_by_uuid(
    State(state): State<AppState>,
    ApiPath(raw): ApiPath<String>,
) -> AppResult<Json<ApiResponse<DownloadPageResponse>>> {
    let download_uuid =
        Uuid::parse_str(&raw).map_err(|_| CoreError::session_not_found(&raw))?;
    let participation = ParticipationRepo::find_by_uuid(&state.pool, download_uuid)
        .await?
        .ok_or_else(|| CoreError::session_not_found(&raw))?;

    let url_for = |kind: ImageKind| {
        participation
            .generated_image_path(kind)
            .map(|path| public_url(&state, path))
    };

    Ok(ApiResponse::ok(
        DownloadPageResponse {
            participation_id: participation.id,
            gender: participation.gender(),
            generated_profile_image_path: participation.generated_profile_image_path.clone(),
            generated_talent_image_path: participation.generated_talent_image_path.clone(),
            profile_image_url: url_for(ImageKind::Profile),
            talent_image_url: url_for(ImageKind::Talent),
            selected_profile_name: selected_name(&state.pool, &participation, ImageKind::Profile)
                .await?,
            selected_talent_name: selected_name(&state.pool, &participation, ImageKind::Talent)
                .await?,
        },
        "Session retrieved successfully",
    ))
}
