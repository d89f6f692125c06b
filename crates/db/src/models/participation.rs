use kiosk_core::session::{Gender, ImageKind};
use kiosk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `participations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Participation {
    pub id: DbId,
    pub download_uuid: Uuid,
    pub consent_agreed: bool,
    pub gender: Option<String>,
    pub original_image_path: Option<String>,
    pub selected_profile_id: Option<DbId>,
    pub selected_talent_id: Option<DbId>,
    pub generated_profile_image_path: Option<String>,
    pub generated_talent_image_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Participation {
    /// Parsed gender; `None` until chosen.
    pub fn gender(&self) -> Option<Gender> {
        self.gender.as_deref().and_then(|g| Gender::parse(g).ok())
    }

    pub fn generated_image_path(&self, kind: ImageKind) -> Option<&str> {
        match kind {
            ImageKind::Profile => self.generated_profile_image_path.as_deref(),
            ImageKind::Talent => self.generated_talent_image_path.as_deref(),
        }
    }

    pub fn selected_target_id(&self, kind: ImageKind) -> Option<DbId> {
        match kind {
            ImageKind::Profile => self.selected_profile_id,
            ImageKind::Talent => self.selected_talent_id,
        }
    }
}

/// Files referenced by a participation removed by the retention job.
#[derive(Debug, Clone, FromRow)]
pub struct PurgedParticipation {
    pub id: DbId,
    pub original_image_path: Option<String>,
    pub generated_profile_image_path: Option<String>,
    pub generated_talent_image_path: Option<String>,
}

impl PurgedParticipation {
    pub fn file_paths(&self) -> impl Iterator<Item = &str> {
        [
            self.original_image_path.as_deref(),
            self.generated_profile_image_path.as_deref(),
            self.generated_talent_image_path.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}
