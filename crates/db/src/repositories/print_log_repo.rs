//! Repository for the `print_logs` table.

use kiosk_core::session::ImageKind;
use kiosk_core::types::DbId;
use sqlx::PgPool;

use crate::models::print_log::PrintLog;

const COLUMNS: &str = "id, participation_id, image_type, printed_at";

fn printed_flag_column(kind: ImageKind) -> &'static str {
    match kind {
        ImageKind::Profile => "is_printed_profile",
        ImageKind::Talent => "is_printed_talent",
    }
}

pub struct PrintLogRepo;

impl PrintLogRepo {
    /// Append a print log and set the matching history flag in one
    /// transaction. Setting the flag is idempotent.
    pub async fn create(
        pool: &PgPool,
        participation_id: DbId,
        kind: ImageKind,
    ) -> Result<PrintLog, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO print_logs (participation_id, image_type)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let log = sqlx::query_as::<_, PrintLog>(&query)
            .bind(participation_id)
            .bind(kind.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE participation_histories SET {flag} = true
             WHERE original_participation_id = $1",
            flag = printed_flag_column(kind),
        );
        sqlx::query(&query)
            .bind(participation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(log)
    }

    /// Print logs for a participation, oldest first.
    pub async fn list_by_participation(
        pool: &PgPool,
        participation_id: DbId,
    ) -> Result<Vec<PrintLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM print_logs WHERE participation_id = $1 ORDER BY printed_at, id"
        );
        sqlx::query_as::<_, PrintLog>(&query)
            .bind(participation_id)
            .fetch_all(pool)
            .await
    }
}
