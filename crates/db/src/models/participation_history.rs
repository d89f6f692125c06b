use kiosk_core::session::Gender;
use kiosk_core::statistics::HistoryFacts;
use kiosk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `participation_histories` table.
///
/// Keyed by `original_participation_id`, which is not a foreign key: the
/// row survives deletion of its participation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParticipationHistory {
    pub id: DbId,
    pub original_participation_id: DbId,
    pub gender: Option<String>,
    pub selected_profile_name: Option<String>,
    pub selected_talent_name: Option<String>,
    pub is_printed_profile: bool,
    pub is_printed_talent: bool,
    pub is_download_page_accessed: bool,
    pub download_count_profile: i32,
    pub download_count_talent: i32,
    pub created_at: Timestamp,
}

impl ParticipationHistory {
    /// The slice of this row the statistics rollups consume.
    pub fn facts(&self) -> HistoryFacts {
        HistoryFacts {
            gender: self.gender.as_deref().and_then(|g| Gender::parse(g).ok()),
            profile_name: self.selected_profile_name.clone(),
            talent_name: self.selected_talent_name.clone(),
            printed_profile: self.is_printed_profile,
            printed_talent: self.is_printed_talent,
            page_accessed: self.is_download_page_accessed,
            downloads_profile: i64::from(self.download_count_profile),
            downloads_talent: i64::from(self.download_count_talent),
            created_at: self.created_at,
        }
    }
}
