//! Integration tests for `ParticipationRepo`.
//!
//! - `create` inserts the participation and its history row together
//! - gender and generation writes are mirrored into history
//! - unknown ids write nothing
//! - retention deletes strictly older rows, cascades print logs and keeps history

use assert_matches::assert_matches;
use chrono::SubsecRound;
use kiosk_core::session::{Gender, ImageKind};
use kiosk_db::repositories::{
    ParticipationHistoryRepo, ParticipationRepo, PrintLogRepo, TargetRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn backdate(pool: &PgPool, id: i64, days: i32) {
    sqlx::query("UPDATE participations SET created_at = now() - make_interval(days => $2) WHERE id = $1")
        .bind(id)
        .bind(days)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_inserts_history_row(pool: PgPool) {
    let p = ParticipationRepo::create(&pool, true).await.unwrap();
    assert!(p.consent_agreed);
    assert!(p.gender.is_none());

    let history = ParticipationHistoryRepo::find_by_participation(&pool, p.id)
        .await
        .unwrap()
        .expect("history row created alongside participation");
    assert_eq!(history.created_at, p.created_at);
    assert!(!history.is_printed_profile);
    assert_eq!(history.download_count_talent, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn download_uuids_are_unique(pool: PgPool) {
    let a = ParticipationRepo::create(&pool, true).await.unwrap();
    let b = ParticipationRepo::create(&pool, true).await.unwrap();
    assert_ne!(a.download_uuid, b.download_uuid);

    let found = ParticipationRepo::find_by_uuid(&pool, b.download_uuid)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, b.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_gender_mirrors_into_history(pool: PgPool) {
    let p = ParticipationRepo::create(&pool, true).await.unwrap();

    let updated = ParticipationRepo::set_gender(&pool, p.id, Gender::Female)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.gender(), Some(Gender::Female));

    let history = ParticipationHistoryRepo::find_by_participation(&pool, p.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(history.gender.as_deref(), Some("female"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_gender_on_unknown_id_returns_none(pool: PgPool) {
    let result = ParticipationRepo::set_gender(&pool, 999_999, Gender::Male)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_generation_sets_path_target_and_history_name(pool: PgPool) {
    let p = ParticipationRepo::create(&pool, true).await.unwrap();
    ParticipationRepo::set_gender(&pool, p.id, Gender::Male).await.unwrap();

    let targets = TargetRepo::list(&pool, ImageKind::Talent, Some(Gender::Male))
        .await
        .unwrap();
    let target = &targets[0];

    let updated = ParticipationRepo::record_generation(
        &pool,
        p.id,
        ImageKind::Talent,
        target,
        "./output/talent_x.jpg",
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(
        updated.generated_image_path(ImageKind::Talent),
        Some("./output/talent_x.jpg")
    );
    assert_eq!(updated.selected_target_id(ImageKind::Talent), Some(target.id));
    assert!(updated.generated_image_path(ImageKind::Profile).is_none());

    let history = ParticipationHistoryRepo::find_by_participation(&pool, p.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(history.selected_talent_name.as_deref(), Some(target.name.as_str()));
    assert!(history.selected_profile_name.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn retention_deletes_only_strictly_older_rows(pool: PgPool) {
    let old = ParticipationRepo::create(&pool, true).await.unwrap();
    let recent = ParticipationRepo::create(&pool, true).await.unwrap();
    ParticipationRepo::set_original_image(&pool, old.id, "./uploads/original_a.jpg")
        .await
        .unwrap();
    backdate(&pool, old.id, 11).await;
    backdate(&pool, recent.id, 9).await;

    let cutoff = chrono::Utc::now() - chrono::Duration::days(10);
    let purged = ParticipationRepo::delete_created_before(&pool, cutoff)
        .await
        .unwrap();

    assert_eq!(purged.len(), 1);
    assert_eq!(purged[0].id, old.id);
    assert_eq!(
        purged[0].file_paths().collect::<Vec<_>>(),
        vec!["./uploads/original_a.jpg"]
    );
    assert!(ParticipationRepo::find_by_id(&pool, old.id).await.unwrap().is_none());
    assert!(ParticipationRepo::find_by_id(&pool, recent.id).await.unwrap().is_some());

    // History outlives the participation.
    assert!(ParticipationHistoryRepo::find_by_participation(&pool, old.id)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn retention_keeps_row_exactly_at_cutoff(pool: PgPool) {
    // Postgres stores microseconds; keep the cutoff representable.
    let cutoff = (chrono::Utc::now() - chrono::Duration::days(10)).trunc_subsecs(6);
    let at_cutoff = ParticipationRepo::create(&pool, true).await.unwrap();
    let just_before = ParticipationRepo::create(&pool, true).await.unwrap();

    for (id, created_at) in [
        (at_cutoff.id, cutoff),
        (just_before.id, cutoff - chrono::Duration::microseconds(1)),
    ] {
        sqlx::query("UPDATE participations SET created_at = $2 WHERE id = $1")
            .bind(id)
            .bind(created_at)
            .execute(&pool)
            .await
            .unwrap();
    }

    let purged = ParticipationRepo::delete_created_before(&pool, cutoff)
        .await
        .unwrap();

    assert_eq!(purged.iter().map(|p| p.id).collect::<Vec<_>>(), vec![just_before.id]);
    assert!(ParticipationRepo::find_by_id(&pool, at_cutoff.id)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn retention_cascades_print_logs(pool: PgPool) {
    let p = ParticipationRepo::create(&pool, true).await.unwrap();
    PrintLogRepo::create(&pool, p.id, ImageKind::Profile).await.unwrap();
    backdate(&pool, p.id, 30).await;

    let cutoff = chrono::Utc::now() - chrono::Duration::days(10);
    ParticipationRepo::delete_created_before(&pool, cutoff)
        .await
        .unwrap();

    let logs = PrintLogRepo::list_by_participation(&pool, p.id).await.unwrap();
    assert!(logs.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn print_log_for_unknown_participation_violates_fk(pool: PgPool) {
    let err = PrintLogRepo::create(&pool, 424_242, ImageKind::Talent)
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref e) if e.is_foreign_key_violation());
}
