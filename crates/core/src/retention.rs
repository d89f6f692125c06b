//! Data-retention policy for participation records.
//!
//! Participations (and their print logs) are purged once they are older than
//! the retention window. The cleanup job runs one pass immediately at
//! startup, then sleeps `interval` after a successful pass or
//! `failure_backoff` after a failed one.

use std::time::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default age after which a participation is purged.
pub const DEFAULT_RETENTION_DAYS: i64 = 10;

/// Longest accepted retention window (about ten years).
pub const MAX_RETENTION_DAYS: i64 = 3650;

/// Default pause between successful cleanup passes.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(24 * 3600);

/// Default pause after a failed cleanup pass.
pub const DEFAULT_FAILURE_BACKOFF: Duration = Duration::from_secs(3600);

/// Outcome of a single cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Succeeded { deleted: u64 },
    Failed,
}

/// Retention window and cleanup cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub retention_days: i64,
    pub interval: Duration,
    pub failure_backoff: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            interval: DEFAULT_CLEANUP_INTERVAL,
            failure_backoff: DEFAULT_FAILURE_BACKOFF,
        }
    }
}

impl RetentionPolicy {
    /// Build a policy, rejecting windows that would purge live sessions or
    /// overflow, and zero pauses that would spin the cleanup loop.
    pub fn new(
        retention_days: i64,
        interval: Duration,
        failure_backoff: Duration,
    ) -> Result<Self, CoreError> {
        if !(1..=MAX_RETENTION_DAYS).contains(&retention_days) {
            return Err(CoreError::Validation(format!(
                "retention days must be between 1 and {MAX_RETENTION_DAYS}, got {retention_days}"
            )));
        }
        if interval.is_zero() {
            return Err(CoreError::Validation("cleanup interval must be non-zero".into()));
        }
        if failure_backoff.is_zero() {
            return Err(CoreError::Validation("failure backoff must be non-zero".into()));
        }
        Ok(Self {
            retention_days,
            interval,
            failure_backoff,
        })
    }

    /// Rows created strictly before this instant are expired; a row exactly
    /// at the cutoff is kept.
    pub fn cutoff(&self, now: Timestamp) -> Timestamp {
        now - chrono::Duration::days(self.retention_days)
    }

    /// How long to sleep before the next pass.
    pub fn next_delay(&self, outcome: PassOutcome) -> Duration {
        match outcome {
            PassOutcome::Succeeded { .. } => self.interval,
            PassOutcome::Failed => self.failure_backoff,
        }
    }
}
