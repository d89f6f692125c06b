//! Periodic purge of expired participations.
//!
//! One pass runs as soon as the task starts. After that the job sleeps
//! for the policy interval following a successful pass, or the shorter
//! failure backoff following a failed one. Print logs cascade with their
//! participation; history rows are never touched.

use std::io::ErrorKind;

use chrono::Utc;
use kiosk_core::retention::{PassOutcome, RetentionPolicy};
use kiosk_core::types::Timestamp;
use kiosk_db::models::participation::PurgedParticipation;
use kiosk_db::repositories::ParticipationRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run the retention loop until `cancel` is triggered.
pub async fn run(pool: PgPool, policy: RetentionPolicy, cancel: CancellationToken) {
    tracing::info!(
        retention_days = policy.retention_days,
        interval_secs = policy.interval.as_secs(),
        backoff_secs = policy.failure_backoff.as_secs(),
        "Retention job started"
    );

    loop {
        let outcome = run_pass(&pool, &policy, Utc::now()).await;
        let delay = policy.next_delay(outcome);
        tracing::debug!(next_in_secs = delay.as_secs(), "Retention job sleeping");

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Retention job stopping");
                break;
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

/// Delete every participation older than the policy cutoff as of `now`
/// and remove the files it referenced.
pub async fn run_pass(pool: &PgPool, policy: &RetentionPolicy, now: Timestamp) -> PassOutcome {
    let cutoff = policy.cutoff(now);
    match ParticipationRepo::delete_created_before(pool, cutoff).await {
        Ok(purged) => {
            let deleted = purged.len() as u64;
            remove_files(&purged).await;
            if deleted > 0 {
                tracing::info!(deleted, %cutoff, "Retention: purged expired participations");
            } else {
                tracing::debug!(%cutoff, "Retention: nothing to purge");
            }
            PassOutcome::Succeeded { deleted }
        }
        Err(e) => {
            tracing::error!(error = %e, "Retention: cleanup failed");
            PassOutcome::Failed
        }
    }
}

/// Best-effort removal; files already gone are ignored.
async fn remove_files(purged: &[PurgedParticipation]) {
    for path in purged.iter().flat_map(|p| p.file_paths()) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!(path, "Retention: removed file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path, error = %e, "Retention: could not remove file"),
        }
    }
}
