use kiosk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from `target_profiles` or `target_talents`; both tables share
/// this shape.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Target {
    pub id: DbId,
    pub name: String,
    pub gender_filter: String,
    pub target_image_path: String,
    #[serde(skip)]
    pub created_at: Timestamp,
}
