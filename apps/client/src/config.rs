use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Application configuration loaded from environment variables. Every knob
/// has a default, so the client starts with no environment at all.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the generation service.
    pub api_base_url: String,
    /// Per-request timeout. Generation calls are slow; keep this generous.
    pub request_timeout: Duration,
    /// Directory downloads are saved into.
    pub download_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse::<u64>()
                    .context("REQUEST_TIMEOUT_SECS must be a number of seconds")?,
            ),
            download_dir: std::env::var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
