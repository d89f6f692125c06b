//! Repository for the `participations` table.
//!
//! Every mutation that is mirrored into `participation_histories` runs in
//! a single transaction; the history row is created alongside the
//! participation.

use kiosk_core::session::{Gender, ImageKind};
use kiosk_core::types::{DbId, Timestamp};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::participation::{Participation, PurgedParticipation};
use crate::models::target::Target;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, download_uuid, consent_agreed, gender, original_image_path, \
    selected_profile_id, selected_talent_id, generated_profile_image_path, \
    generated_talent_image_path, created_at, updated_at";

fn generated_path_column(kind: ImageKind) -> &'static str {
    match kind {
        ImageKind::Profile => "generated_profile_image_path",
        ImageKind::Talent => "generated_talent_image_path",
    }
}

fn selected_id_column(kind: ImageKind) -> &'static str {
    match kind {
        ImageKind::Profile => "selected_profile_id",
        ImageKind::Talent => "selected_talent_id",
    }
}

fn history_name_column(kind: ImageKind) -> &'static str {
    match kind {
        ImageKind::Profile => "selected_profile_name",
        ImageKind::Talent => "selected_talent_name",
    }
}

pub struct ParticipationRepo;

impl ParticipationRepo {
    /// Insert a new participation with a fresh download UUID, plus its
    /// history row, in one transaction.
    pub async fn create(pool: &PgPool, consent_agreed: bool) -> Result<Participation, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO participations (download_uuid, consent_agreed)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let participation = sqlx::query_as::<_, Participation>(&query)
            .bind(Uuid::new_v4())
            .bind(consent_agreed)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO participation_histories (original_participation_id, created_at)
             VALUES ($1, $2)",
        )
        .bind(participation.id)
        .bind(participation.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(participation)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Participation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM participations WHERE id = $1");
        sqlx::query_as::<_, Participation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a participation by its public download UUID.
    pub async fn find_by_uuid(
        pool: &PgPool,
        download_uuid: Uuid,
    ) -> Result<Option<Participation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM participations WHERE download_uuid = $1");
        sqlx::query_as::<_, Participation>(&query)
            .bind(download_uuid)
            .fetch_optional(pool)
            .await
    }

    /// Set the visitor's gender on the participation and its history row.
    ///
    /// Returns `None` (and writes nothing) if no participation has this id.
    pub async fn set_gender(
        pool: &PgPool,
        id: DbId,
        gender: Gender,
    ) -> Result<Option<Participation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE participations SET gender = $2, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(participation) = sqlx::query_as::<_, Participation>(&query)
            .bind(id)
            .bind(gender.as_str())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE participation_histories SET gender = $2
             WHERE original_participation_id = $1",
        )
        .bind(id)
        .bind(gender.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(participation))
    }

    /// Record the stored path of the visitor's uploaded photo.
    pub async fn set_original_image(
        pool: &PgPool,
        id: DbId,
        path: &str,
    ) -> Result<Option<Participation>, sqlx::Error> {
        let query = format!(
            "UPDATE participations SET original_image_path = $2, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participation>(&query)
            .bind(id)
            .bind(path)
            .fetch_optional(pool)
            .await
    }

    /// Persist a finished generation: the output path and chosen target on
    /// the participation, the target's display name on the history row.
    pub async fn record_generation(
        pool: &PgPool,
        id: DbId,
        kind: ImageKind,
        target: &Target,
        generated_path: &str,
    ) -> Result<Option<Participation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE participations SET {path_col} = $2, {target_col} = $3, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}",
            path_col = generated_path_column(kind),
            target_col = selected_id_column(kind),
        );
        let Some(participation) = sqlx::query_as::<_, Participation>(&query)
            .bind(id)
            .bind(generated_path)
            .bind(target.id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE participation_histories SET {name_col} = $2
             WHERE original_participation_id = $1",
            name_col = history_name_column(kind),
        );
        sqlx::query(&query)
            .bind(id)
            .bind(&target.name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(participation))
    }

    /// Hard-delete every participation created strictly before `cutoff`.
    ///
    /// Print logs cascade; history rows are untouched. Returns the purged
    /// rows' file references so the caller can remove them from disk.
    pub async fn delete_created_before(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<PurgedParticipation>, sqlx::Error> {
        sqlx::query_as::<_, PurgedParticipation>(
            "DELETE FROM participations WHERE created_at < $1
             RETURNING id, original_image_path, generated_profile_image_path,
                       generated_talent_image_path",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }
}
