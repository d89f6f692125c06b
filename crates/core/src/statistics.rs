//! Dashboard statistics over participation history.
//!
//! Pure aggregation: callers load the (optionally date-filtered) history
//! rows, map them to [`HistoryFacts`], and hand them to [`summarize`] or
//! [`daily_breakdown`]. Zero rows produce zeroed structures, never errors.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::CoreError;
use crate::session::Gender;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of entries in the popular-profile / popular-talent rankings.
pub const TOP_N: usize = 5;

/// Print types a single session can produce (profile + talent).
pub const PRINT_TYPES_PER_SESSION: f64 = 2.0;

/// Default window for the daily breakdown.
pub const DEFAULT_DAILY_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The analytics-relevant slice of one participation history row.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryFacts {
    pub gender: Option<Gender>,
    pub profile_name: Option<String>,
    pub talent_name: Option<String>,
    pub printed_profile: bool,
    pub printed_talent: bool,
    pub page_accessed: bool,
    pub downloads_profile: i64,
    pub downloads_talent: i64,
    pub created_at: Timestamp,
}

impl HistoryFacts {
    fn downloads(&self) -> i64 {
        self.downloads_profile + self.downloads_talent
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenderStats {
    pub male: i64,
    pub female: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrintStats {
    pub profile_printed: i64,
    pub talent_printed: i64,
    pub total_prints: i64,
    /// `total_prints / (sessions * 2) * 100`, two decimals.
    pub print_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DownloadStats {
    pub qr_scanned: i64,
    pub qr_scan_rate: f64,
    pub total_downloads_profile: i64,
    pub total_downloads_talent: i64,
    pub avg_downloads_per_user: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularItem {
    pub name: String,
    pub count: i64,
}

/// Full dashboard rollup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total_participations: i64,
    pub gender_stats: GenderStats,
    pub print_stats: PrintStats,
    pub download_stats: DownloadStats,
    pub popular_profiles: Vec<PopularItem>,
    pub popular_talents: Vec<PopularItem>,
}

/// One calendar day of activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub count: i64,
    /// Sessions with at least one print.
    pub prints: i64,
    pub downloads: i64,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Roll a set of history rows up into dashboard statistics.
pub fn summarize(facts: &[HistoryFacts]) -> Statistics {
    let total = facts.len() as i64;
    if total == 0 {
        return Statistics::default();
    }

    let count = |pred: fn(&HistoryFacts) -> bool| facts.iter().filter(|f| pred(f)).count() as i64;

    let male = count(|f| f.gender == Some(Gender::Male));
    let female = count(|f| f.gender == Some(Gender::Female));

    let profile_printed = count(|f| f.printed_profile);
    let talent_printed = count(|f| f.printed_talent);
    let total_prints = profile_printed + talent_printed;

    let qr_scanned = count(|f| f.page_accessed);
    let total_downloads_profile: i64 = facts.iter().map(|f| f.downloads_profile).sum();
    let total_downloads_talent: i64 = facts.iter().map(|f| f.downloads_talent).sum();

    let sessions = total as f64;

    Statistics {
        total_participations: total,
        gender_stats: GenderStats { male, female },
        print_stats: PrintStats {
            profile_printed,
            talent_printed,
            total_prints,
            print_rate: round2(total_prints as f64 / (sessions * PRINT_TYPES_PER_SESSION) * 100.0),
        },
        download_stats: DownloadStats {
            qr_scanned,
            qr_scan_rate: round2(qr_scanned as f64 / sessions * 100.0),
            total_downloads_profile,
            total_downloads_talent,
            avg_downloads_per_user: round2(
                (total_downloads_profile + total_downloads_talent) as f64 / sessions,
            ),
        },
        popular_profiles: top_names(facts.iter().filter_map(|f| f.profile_name.as_deref())),
        popular_talents: top_names(facts.iter().filter_map(|f| f.talent_name.as_deref())),
    }
}

/// Group rows by UTC calendar date of `created_at`, ascending. Days without
/// rows are omitted.
pub fn daily_breakdown(facts: &[HistoryFacts]) -> Vec<DailyStat> {
    let mut days: BTreeMap<NaiveDate, DailyStat> = BTreeMap::new();

    for fact in facts {
        let date = fact.created_at.date_naive();
        let day = days.entry(date).or_insert(DailyStat {
            date,
            count: 0,
            prints: 0,
            downloads: 0,
        });
        day.count += 1;
        if fact.printed_profile || fact.printed_talent {
            day.prints += 1;
        }
        day.downloads += fact.downloads();
    }

    days.into_values().collect()
}

/// Earliest `created_at` included in a daily breakdown of `days` days.
pub fn daily_window_start(now: Timestamp, days: i64) -> Timestamp {
    now - chrono::Duration::days(days)
}

// ---------------------------------------------------------------------------
// Date range
// ---------------------------------------------------------------------------

/// Half-open `[from, until)` timestamp bounds for a statistics query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Timestamp>,
    pub until: Option<Timestamp>,
}

impl DateRange {
    /// Build bounds from optional `YYYY-MM-DD` strings. Both days are
    /// inclusive: `end_date` covers that whole UTC day.
    pub fn parse(start_date: Option<&str>, end_date: Option<&str>) -> Result<Self, CoreError> {
        let start = start_date.map(|s| parse_date("start_date", s)).transpose()?;
        let end = end_date.map(|s| parse_date("end_date", s)).transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(CoreError::Validation(format!(
                    "start_date ({start}) must not be after end_date ({end})"
                )));
            }
        }

        Ok(Self {
            from: start.map(start_of_day),
            until: end
                .and_then(|d| d.succ_opt())
                .map(start_of_day),
        })
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(format!("{field} must be formatted YYYY-MM-DD, got '{value}'"))
    })
}

fn start_of_day(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN).and_utc()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Frequency ranking: count descending, then name ascending; at most [`TOP_N`].
fn top_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<PopularItem> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for name in names {
        *counts.entry(name).or_default() += 1;
    }

    let mut ranked: Vec<PopularItem> = counts
        .into_iter()
        .map(|(name, count)| PopularItem {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_N);
    ranked
}
