use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use chrono::Duration;

use crate::report::session::DEFAULT_SESSION_TTL_MINUTES;

/// Application configuration loaded from environment variables.
///
/// `GOOGLE_API_KEY` is deliberately optional here: a missing key is reported by
/// the generation stage when a report is requested, not at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub output_dir: PathBuf,
    pub port: u16,
    /// Max age of an unfinished report session.
    pub session_ttl: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ttl_minutes = match optional_env("REPORT_SESSION_TTL_MINUTES") {
            Some(raw) => raw
                .parse::<u32>()
                .context("REPORT_SESSION_TTL_MINUTES must be a whole number of minutes")?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };
        ensure!(ttl_minutes > 0, "REPORT_SESSION_TTL_MINUTES must be at least 1");

        Ok(Config {
            google_api_key: optional_env("GOOGLE_API_KEY"),
            output_dir: optional_env("REPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            session_ttl: Duration::minutes(i64::from(ttl_minutes)),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
