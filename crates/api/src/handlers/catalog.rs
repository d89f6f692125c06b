//! Handlers for the read-only target catalog.

use axum::extract::State;
use axum::Json;
use kiosk_core::session::{Gender, ImageKind};
use kiosk_db::models::target::Target;
use kiosk_db::repositories::TargetRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::ApiQuery;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query params for the catalog listings (`?gender=male|female`).
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub gender: Option<String>,
}

/// GET /api/v1/profiles
pub async fn list_profiles(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CatalogQuery>,
) -> AppResult<Json<ApiResponse<Vec<Target>>>> {
    let targets = list(&state, ImageKind::Profile, query).await?;
    Ok(ApiResponse::ok(targets, "Profiles retrieved successfully"))
}

/// GET /api/v1/talents
pub async fn list_talents(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CatalogQuery>,
) -> AppResult<Json<ApiResponse<Vec<Target>>>> {
    let targets = list(&state, ImageKind::Talent, query).await?;
    Ok(ApiResponse::ok(targets, "Talents retrieved successfully"))
}

async fn list(state: &AppState, kind: ImageKind, query: CatalogQuery) -> AppResult<Vec<Target>> {
    let gender = query.gender.as_deref().map(Gender::parse).transpose()?;
    Ok(TargetRepo::list(&state.pool, kind, gender).await?)
}
