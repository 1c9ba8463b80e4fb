use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub doubao_api_key: String,
    pub oracle_api_url: String,
    pub oracle_model: String,
    pub oracle_timeout: Duration,
    /// Replaces the built-in vocabulary table when set.
    pub vocabulary_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            doubao_api_key: require_env("DOUBAO_API_KEY")?,
            oracle_api_url: optional_env("ORACLE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            oracle_model: optional_env("ORACLE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            oracle_timeout: Duration::from_secs(
                parse_env("ORACLE_TIMEOUT_SECS", 60)
                    .context("ORACLE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            vocabulary_path: optional_env("VOCABULARY_PATH").map(PathBuf::from),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: parse_env("PORT", 8001).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Set and non-blank, trimmed.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("invalid value '{raw}' for {key}")),
        None => Ok(default),
    }
}
