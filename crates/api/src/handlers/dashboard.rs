//! Handlers for the operator dashboard.
//!
//! Both endpoints read participation history only, so figures survive the
//! retention job deleting the sessions themselves.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use kiosk_core::error::CoreError;
use kiosk_core::statistics::{self, DailyStat, DateRange, Statistics, DEFAULT_DAILY_DAYS};
use kiosk_db::repositories::ParticipationHistoryRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::ApiQuery;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query params for `GET /dashboard/statistics` (`YYYY-MM-DD`, inclusive).
#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Query params for `GET /dashboard/daily-stats`.
#[derive(Debug, Deserialize, Validate)]
pub struct DailyStatsQuery {
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = 90))]
    pub days: i64,
}

fn default_days() -> i64 {
    DEFAULT_DAILY_DAYS
}

/// GET /api/v1/dashboard/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatisticsQuery>,
) -> AppResult<Json<ApiResponse<Statistics>>> {
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;

    let rows =
        ParticipationHistoryRepo::list_created_between(&state.pool, range.from, range.until)
            .await?;
    let facts: Vec<_> = rows.iter().map(|r| r.facts()).collect();

    Ok(ApiResponse::ok(
        statistics::summarize(&facts),
        "Statistics retrieved successfully",
    ))
}

/// GET /api/v1/dashboard/daily-stats
pub async fn get_daily_stats(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DailyStatsQuery>,
) -> AppResult<Json<ApiResponse<Vec<DailyStat>>>> {
    query
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let since = statistics::daily_window_start(Utc::now(), query.days);
    let rows = ParticipationHistoryRepo::list_created_between(&state.pool, Some(since), None).await?;
    let facts: Vec<_> = rows.iter().map(|r| r.facts()).collect();

    Ok(ApiResponse::ok(
        statistics::daily_breakdown(&facts),
        "Daily statistics retrieved successfully",
    ))
}
