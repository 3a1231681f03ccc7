use crate::error::{AppError, Result};

pub const DB_PATH: &str = "./data/metrics.db";
pub const EXPORT_JSON_PATH: &str = "./data/top25.json";

/// Default number of rows printed and exported.
pub const DEFAULT_LIMIT: u32 = 25;

/// Hard ceiling for `--limit`.
pub const MAX_LIMIT: u32 = 100;

/// Watch view snapshot reload interval (seconds).
pub const WATCH_REFRESH_SECS: u64 = 5;

/// Decimal places kept for scores in the JSON export.
pub const EXPORT_PRECISION: i32 = 6;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub export_json_path: String,
    pub log_level: String,
    /// Rows to print/export when `--limit` is not given (SCORE_LIMIT)
    pub limit: u32,
    /// Seconds between snapshot reloads in the watch view (WATCH_REFRESH_SECS)
    pub watch_refresh_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let limit = std::env::var("SCORE_LIMIT")
            .unwrap_or_else(|_| DEFAULT_LIMIT.to_string())
            .parse::<u32>()
            .map_err(|_| AppError::Config("SCORE_LIMIT must be a positive integer".to_string()))?;
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::Config(format!(
                "SCORE_LIMIT must be between 1 and {MAX_LIMIT}"
            )));
        }

        Ok(Self {
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| DB_PATH.to_string()),
            export_json_path: std::env::var("EXPORT_JSON_PATH")
                .unwrap_or_else(|_| EXPORT_JSON_PATH.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            limit,
            watch_refresh_secs: std::env::var("WATCH_REFRESH_SECS")
                .unwrap_or_else(|_| WATCH_REFRESH_SECS.to_string())
                .parse::<u64>()
                .map_err(|_| {
                    AppError::Config("WATCH_REFRESH_SECS must be a whole number of seconds".to_string())
                })?
                .max(1),
        })
    }
}
