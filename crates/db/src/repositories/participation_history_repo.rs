//! Repository for the `participation_histories` table.

use kiosk_core::session::ImageKind;
use kiosk_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::participation_history::ParticipationHistory;

const COLUMNS: &str = "id, original_participation_id, gender, selected_profile_name, \
    selected_talent_name, is_printed_profile, is_printed_talent, is_download_page_accessed, \
    download_count_profile, download_count_talent, created_at";

fn download_count_column(kind: ImageKind) -> &'static str {
    match kind {
        ImageKind::Profile => "download_count_profile",
        ImageKind::Talent => "download_count_talent",
    }
}

pub struct ParticipationHistoryRepo;

impl ParticipationHistoryRepo {
    pub async fn find_by_participation(
        pool: &PgPool,
        participation_id: DbId,
    ) -> Result<Option<ParticipationHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM participation_histories WHERE original_participation_id = $1"
        );
        sqlx::query_as::<_, ParticipationHistory>(&query)
            .bind(participation_id)
            .fetch_optional(pool)
            .await
    }

    /// Flag that the visitor opened the download page via the QR code.
    pub async fn mark_page_accessed(
        pool: &PgPool,
        participation_id: DbId,
    ) -> Result<Option<ParticipationHistory>, sqlx::Error> {
        let query = format!(
            "UPDATE participation_histories SET is_download_page_accessed = true
             WHERE original_participation_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParticipationHistory>(&query)
            .bind(participation_id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically bump the download counter for `kind` and return the new
    /// value. `None` if the history row does not exist.
    pub async fn increment_download(
        pool: &PgPool,
        participation_id: DbId,
        kind: ImageKind,
    ) -> Result<Option<i32>, sqlx::Error> {
        let column = download_count_column(kind);
        let query = format!(
            "UPDATE participation_histories SET {column} = {column} + 1
             WHERE original_participation_id = $1
             RETURNING {column}"
        );
        let row: Option<(i32,)> = sqlx::query_as(&query)
            .bind(participation_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(count,)| count))
    }

    /// History rows with `from <= created_at < until`; either bound may be
    /// open. Ordered oldest first.
    pub async fn list_created_between(
        pool: &PgPool,
        from: Option<Timestamp>,
        until: Option<Timestamp>,
    ) -> Result<Vec<ParticipationHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM participation_histories
             WHERE ($1::timestamptz IS NULL OR created_at >= $1)
               AND ($2::timestamptz IS NULL OR created_at < $2)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ParticipationHistory>(&query)
            .bind(from)
            .bind(until)
            .fetch_all(pool)
            .await
    }
}
