use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use kiosk_core::retention::{RetentionPolicy, DEFAULT_RETENTION_DAYS};
use kiosk_core::upload::{DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE};
use kiosk_facefusion::{FaceFusionConfig, FaceFusionMode};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for a single kiosk on a dev machine.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Pool size (default: `5`).
    pub db_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Request timeout in seconds (default: `300`, so generation is not cut short).
    pub request_timeout_secs: u64,
    /// `development` exposes internal error detail in error envelopes.
    pub environment: String,
    /// Base of the public image URLs handed to the frontend.
    pub public_base_url: String,
    pub storage: StorageConfig,
    pub facefusion: FaceFusionConfig,
    pub scheduler: SchedulerConfig,
}

/// Where uploads and generated composites live, and what may be uploaded.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
}

/// Retention job settings.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub policy: RetentionPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                            | Default                    |
    /// |------------------------------------|----------------------------|
    /// | `HOST`                             | `0.0.0.0`                  |
    /// | `PORT`                             | `8000`                     |
    /// | `DB_MAX_CONNECTIONS`               | `5`                        |
    /// | `CORS_ORIGINS`                     | local frontend dev servers |
    /// | `REQUEST_TIMEOUT_SECS`             | `300`                      |
    /// | `ENVIRONMENT`                      | `development`              |
    /// | `PUBLIC_BASE_URL`                  | `http://localhost:8000`    |
    /// | `STORAGE_UPLOAD_DIR`               | `./uploads`                |
    /// | `STORAGE_OUTPUT_DIR`               | `./output`                 |
    /// | `STORAGE_MAX_FILE_SIZE`            | `10485760`                 |
    /// | `STORAGE_ALLOWED_EXTENSIONS`       | `jpg,jpeg,png`             |
    /// | `FACEFUSION_MODE`                  | `mock`                     |
    /// | `FACEFUSION_PROJECT_PATH`          | `../facefusion`            |
    /// | `FACEFUSION_PYTHON`                | `python3`                  |
    /// | `FACEFUSION_FACE_SWAPPER_MODEL`    | `inswapper_128`            |
    /// | `FACEFUSION_EXECUTION_PROVIDERS`   | `cpu`                      |
    /// | `FACEFUSION_MOCK_DELAY_MS`         | `3500`                     |
    /// | `SCHEDULER_ENABLED`                | `false`                    |
    /// | `SCHEDULER_CLEANUP_INTERVAL_HOURS` | `24`                       |
    /// | `SCHEDULER_RETRY_BACKOFF_MINUTES`  | `60`                       |
    /// | `SCHEDULER_DATA_RETENTION_DAYS`    | `10`                       |
    ///
    /// Panics on unparseable values: misconfiguration should stop startup.
    pub fn from_env() -> Self {
        let storage = StorageConfig {
            upload_dir: PathBuf::from(env_or("STORAGE_UPLOAD_DIR", "./uploads")),
            output_dir: PathBuf::from(env_or("STORAGE_OUTPUT_DIR", "./output")),
            max_file_size: env_parse("STORAGE_MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE),
            allowed_extensions: parse_list(&env_or(
                "STORAGE_ALLOWED_EXTENSIONS",
                &DEFAULT_ALLOWED_EXTENSIONS.join(","),
            ))
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect(),
        };

        let facefusion = FaceFusionConfig {
            mode: FaceFusionMode::parse(&env_or("FACEFUSION_MODE", "mock"))
                .unwrap_or_else(|e| panic!("{e}")),
            project_path: PathBuf::from(env_or("FACEFUSION_PROJECT_PATH", "../facefusion")),
            python: env_or("FACEFUSION_PYTHON", "python3"),
            face_swapper_model: env_or("FACEFUSION_FACE_SWAPPER_MODEL", "inswapper_128"),
            execution_providers: parse_list(&env_or("FACEFUSION_EXECUTION_PROVIDERS", "cpu")),
            mock_delay: Duration::from_millis(env_parse("FACEFUSION_MOCK_DELAY_MS", 3500)),
        };

        let scheduler = SchedulerConfig {
            enabled: parse_bool(&env_or("SCHEDULER_ENABLED", "false")),
            policy: retention_policy(
                env_parse("SCHEDULER_DATA_RETENTION_DAYS", DEFAULT_RETENTION_DAYS),
                env_parse("SCHEDULER_CLEANUP_INTERVAL_HOURS", 24),
                env_parse("SCHEDULER_RETRY_BACKOFF_MINUTES", 60),
            ),
        };

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 8000),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 5),
            cors_origins: parse_list(&env_or(
                "CORS_ORIGINS",
                "http://localhost:5173,http://localhost:5174,http://127.0.0.1:5173",
            )),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 300),
            environment: env_or("ENVIRONMENT", "development"),
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:8000")
                .trim_end_matches('/')
                .to_string(),
            storage,
            facefusion,
            scheduler,
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

/// Retention settings from their env units. Panics on a window outside
/// `1..=MAX_RETENTION_DAYS` or a zero interval/backoff.
fn retention_policy(
    retention_days: i64,
    interval_hours: u64,
    backoff_minutes: u64,
) -> RetentionPolicy {
    RetentionPolicy::new(
        retention_days,
        Duration::from_secs(interval_hours.saturating_mul(3600)),
        Duration::from_secs(backoff_minutes.saturating_mul(60)),
    )
    .unwrap_or_else(|e| panic!("Invalid scheduler settings: {e}"))
}

/// Split a comma-separated value, trimming entries and dropping empties.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `true`, `1`, `yes` and `on` (any case) enable a flag.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_parsing_trims_and_skips_empties() {
        assert_eq!(
            parse_list(" jpg, png ,,jpeg "),
            vec!["jpg".to_string(), "png".to_string(), "jpeg".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn retention_policy_converts_units() {
        let policy = retention_policy(10, 24, 60);
        assert_eq!(policy, RetentionPolicy::default());
    }

    #[test]
    #[should_panic(expected = "Invalid scheduler settings")]
    fn zero_retention_days_stops_startup() {
        retention_policy(0, 24, 60);
    }

    #[test]
    #[should_panic(expected = "Invalid scheduler settings")]
    fn negative_retention_days_stops_startup() {
        retention_policy(-1, 24, 60);
    }

    #[test]
    #[should_panic(expected = "Invalid scheduler settings")]
    fn huge_retention_days_stops_startup() {
        retention_policy(i64::MAX, 24, 60);
    }

    #[test]
    #[should_panic(expected = "Invalid scheduler settings")]
    fn zero_cleanup_interval_stops_startup() {
        retention_policy(10, 0, 60);
    }

    #[test]
    #[should_panic(expected = "Invalid scheduler settings")]
    fn zero_retry_backoff_stops_startup() {
        retention_policy(10, 24, 0);
    }

    #[test]
    fn bool_parsing() {
        for raw in ["true", "TRUE", "1", "yes", " on "] {
            assert!(parse_bool(raw), "{raw} should enable");
        }
        for raw in ["false", "0", "", "nope"] {
            assert!(!parse_bool(raw), "{raw} should disable");
        }
    }
}
