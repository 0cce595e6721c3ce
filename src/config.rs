//! Environment-driven configuration.

use anyhow::{Context, Result};
use url::Url;

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the assessment backend.
    pub api_base: String,
    /// Public origin used to derive shareable report/invite links.
    pub origin: String,
    pub http_timeout_secs: u64,
    pub retry_max: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("API_BASE")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            origin: std::env::var("APP_ORIGIN")
                .unwrap_or_else(|_| "http://127.0.0.1:5173".to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            retry_max: std::env::var("RETRY_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_base_delay_ms: std::env::var("RETRY_BASE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            retry_max_delay_ms: std::env::var("RETRY_MAX_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
        }
    }

    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.origin).with_context(|| format!("bad APP_ORIGIN: {}", self.origin))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
