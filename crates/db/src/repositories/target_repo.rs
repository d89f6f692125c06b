//! Repository for the target catalog.
//!
//! `target_profiles` and `target_talents` share one shape, so a single
//! repository serves both, selecting the table from the [`ImageKind`].

use kiosk_core::session::{Gender, ImageKind};
use kiosk_core::types::DbId;
use sqlx::PgPool;

use crate::models::target::Target;

const COLUMNS: &str = "id, name, gender_filter, target_image_path, created_at";

fn table(kind: ImageKind) -> &'static str {
    match kind {
        ImageKind::Profile => "target_profiles",
        ImageKind::Talent => "target_talents",
    }
}

pub struct TargetRepo;

impl TargetRepo {
    /// List targets of `kind`, optionally restricted to one gender, by id.
    pub async fn list(
        pool: &PgPool,
        kind: ImageKind,
        gender: Option<Gender>,
    ) -> Result<Vec<Target>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table}
             WHERE ($1::text IS NULL OR gender_filter = $1)
             ORDER BY id ASC",
            table = table(kind),
        );
        sqlx::query_as::<_, Target>(&query)
            .bind(gender.map(Gender::as_str))
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        kind: ImageKind,
        id: DbId,
    ) -> Result<Option<Target>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", table(kind));
        sqlx::query_as::<_, Target>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
