//! Server Configuration
//!
//! All configuration is read from environment variables:
//!
//! - `OBSERVATORY_ADDR`: bind address (default: 0.0.0.0:8000)
//! - `OBSERVATORY_DATA_DIR`: base data directory (default: ./data)
//! - `OBSERVATORY_ARCHIVE`: raw archive path
//!   (default: `<data>/reddit/comments/RC_2024-11.zst`)
//! - `OBSERVATORY_SNAPSHOT`: snapshot path
//!   (default: `<data>/processed/election_comments.obsn`)
//! - `OBSERVATORY_WINDOW_START` / `OBSERVATORY_WINDOW_END`: RFC3339 bounds
//!   of the ingestion time window (default: election night 2024)
//! - `OBSERVATORY_SAMPLE_DATA`: skip loading and serve synthetic data (any
//!   value)
//! - `OBSERVATORY_ALLOWED_ORIGINS`: comma-separated CORS origins
//!   (default: the local frontend dev ports)
//! - `OBSERVATORY_REPORT_EVERY`: progress report cadence in records
//!   (default: 100000)
//!
//! Malformed values fall back to their defaults with a warning rather than
//! failing startup.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use observatory_core::TimeWindow;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub archive_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub window: TimeWindow,
    pub use_sample_data: bool,
    pub allowed_origins: Vec<String>,
    pub report_every: u64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let addr =
            std::env::var("OBSERVATORY_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let data_dir = PathBuf::from(
            std::env::var("OBSERVATORY_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
        );

        let archive_path = std::env::var("OBSERVATORY_ARCHIVE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("reddit/comments/RC_2024-11.zst"));

        let snapshot_path = std::env::var("OBSERVATORY_SNAPSHOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("processed/election_comments.obsn"));

        let default_window = TimeWindow::election_night_2024();
        let window = TimeWindow::new(
            env_timestamp("OBSERVATORY_WINDOW_START", default_window.start),
            env_timestamp("OBSERVATORY_WINDOW_END", default_window.end),
        );

        let use_sample_data = std::env::var("OBSERVATORY_SAMPLE_DATA").is_ok();

        let allowed_origins = std::env::var("OBSERVATORY_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:3002".to_string(),
                ]
            });

        let report_every = std::env::var("OBSERVATORY_REPORT_EVERY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100_000);

        Self {
            addr,
            archive_path,
            snapshot_path,
            window,
            use_sample_data,
            allowed_origins,
            report_every,
        }
    }
}

fn env_timestamp(name: &str, default: i64) -> i64 {
    match std::env::var(name) {
        Err(_) => default,
        Ok(value) => match DateTime::parse_from_rfc3339(&value) {
            Ok(dt) => dt.with_timezone(&Utc).timestamp(),
            Err(e) => {
                tracing::warn!(%name, %value, error = %e, "ignoring unparseable timestamp");
                default
            }
        },
    }
}
