//! Integration tests for catalog access, print flags and tracking counters.

use kiosk_core::session::{Gender, ImageKind};
use kiosk_db::repositories::{
    ParticipationHistoryRepo, ParticipationRepo, PrintLogRepo, TargetRepo,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn seeded_catalog_is_filtered_by_gender(pool: PgPool) {
    let all_profiles = TargetRepo::list(&pool, ImageKind::Profile, None).await.unwrap();
    assert_eq!(all_profiles.len(), 4);

    let female_talents = TargetRepo::list(&pool, ImageKind::Talent, Some(Gender::Female))
        .await
        .unwrap();
    assert_eq!(female_talents.len(), 2);
    assert!(female_talents.iter().all(|t| t.gender_filter == "female"));

    let ids: Vec<_> = all_profiles.iter().map(|t| t.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_target_by_id_uses_kind_table(pool: PgPool) {
    let talents = TargetRepo::list(&pool, ImageKind::Talent, None).await.unwrap();
    let found = TargetRepo::find_by_id(&pool, ImageKind::Talent, talents[4].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, talents[4].name);

    // Five talents, four profiles: the fifth talent id has no profile twin.
    assert!(TargetRepo::find_by_id(&pool, ImageKind::Profile, talents[4].id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn printing_sets_flag_idempotently(pool: PgPool) {
    let p = ParticipationRepo::create(&pool, true).await.unwrap();

    PrintLogRepo::create(&pool, p.id, ImageKind::Profile).await.unwrap();
    PrintLogRepo::create(&pool, p.id, ImageKind::Profile).await.unwrap();

    let history = ParticipationHistoryRepo::find_by_participation(&pool, p.id)
        .await
        .unwrap()
        .unwrap();
    assert!(history.is_printed_profile);
    assert!(!history.is_printed_talent);

    let logs = PrintLogRepo::list_by_participation(&pool, p.id).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l.image_type == "profile"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn download_counter_increments_by_one(pool: PgPool) {
    let p = ParticipationRepo::create(&pool, true).await.unwrap();

    let first = ParticipationHistoryRepo::increment_download(&pool, p.id, ImageKind::Talent)
        .await
        .unwrap();
    let second = ParticipationHistoryRepo::increment_download(&pool, p.id, ImageKind::Talent)
        .await
        .unwrap();
    assert_eq!(first, Some(1));
    assert_eq!(second, Some(2));

    let history = ParticipationHistoryRepo::find_by_participation(&pool, p.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(history.download_count_profile, 0);
    assert_eq!(history.download_count_talent, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tracking_unknown_participation_returns_none(pool: PgPool) {
    assert!(ParticipationHistoryRepo::increment_download(&pool, 7, ImageKind::Profile)
        .await
        .unwrap()
        .is_none());
    assert!(ParticipationHistoryRepo::mark_page_accessed(&pool, 7)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_created_between_honours_bounds(pool: PgPool) {
    let a = ParticipationRepo::create(&pool, true).await.unwrap();
    let b = ParticipationRepo::create(&pool, true).await.unwrap();
    sqlx::query(
        "UPDATE participation_histories SET created_at = now() - interval '3 days'
         WHERE original_participation_id = $1",
    )
    .bind(a.id)
    .execute(&pool)
    .await
    .unwrap();

    let all = ParticipationHistoryRepo::list_created_between(&pool, None, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].original_participation_id, a.id);

    let since = chrono::Utc::now() - chrono::Duration::days(1);
    let recent = ParticipationHistoryRepo::list_created_between(&pool, Some(since), None)
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].original_participation_id, b.id);

    let older = ParticipationHistoryRepo::list_created_between(&pool, None, Some(since))
        .await
        .unwrap();
    assert_eq!(older.len(), 1);
    assert_eq!(older[0].original_participation_id, a.id);
}
