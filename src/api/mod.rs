//! External collaborators behind one async seam.
//!
//! The core never talks to the network directly; everything it consumes —
//! question lists, report creation, peer submission, report lookup, access
//! code verification — goes through [`Backend`]. `HttpBackend` is the real
//! implementation, `MemoryBackend` serves tests and the demo binary.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::question::{Answer, PeerQuestion, Question};
use crate::report::ReportDocument;

pub mod http;
pub mod memory;
pub mod retry;

#[derive(Clone, Copy, Debug)]
pub enum BackendKind {
    Http,
    Memory,
}

impl BackendKind {
    pub fn from_env() -> Self {
        match std::env::var("BACKEND").unwrap_or_else(|_| "http".to_string()).as_str() {
            "memory" => BackendKind::Memory,
            _ => BackendKind::Http,
        }
    }

    pub fn build(self, cfg: &Config) -> Result<Box<dyn Backend + Send + Sync>> {
        match self {
            BackendKind::Http => Ok(Box::new(http::HttpBackend::new(cfg)?)),
            BackendKind::Memory => Ok(Box::new(memory::MemoryBackend::new())),
        }
    }
}

/// Result of verifying an access code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheck {
    pub valid: bool,
    /// Set when the code was already used: the report it created.
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Identity of a freshly created report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportHandle {
    pub id: String,
}

#[async_trait]
pub trait Backend {
    async fn fetch_questions(&self) -> Result<Vec<Question>>;
    async fn fetch_peer_questions(&self) -> Result<Vec<PeerQuestion>>;
    async fn verify_access_code(&self, code: &str) -> Result<AccessCheck>;
    /// Create the self report from a completed answer set. Called at most
    /// once per completed traversal; on failure no report exists.
    async fn create_report(&self, answers: &[Answer], access_code: &str) -> Result<ReportHandle>;
    /// Record a peer's answers against an existing report identity.
    async fn submit_peer_assessment(&self, token: &str, answers: &[Answer]) -> Result<()>;
    /// `Ok(None)` when the identity does not resolve.
    async fn get_report_by_id(&self, id: &str) -> Result<Option<ReportDocument>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config {
            api_base: "http://127.0.0.1:8000".into(),
            origin: "http://127.0.0.1:5173".into(),
            http_timeout_secs: 5,
            retry_max: 0,
            retry_base_delay_ms: 1,
            retry_max_delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn memory_kind_builds_a_working_backend() {
        let backend = BackendKind::Memory.build(&cfg()).unwrap();
        let questions = backend.fetch_questions().await.unwrap();
        assert_eq!(questions.len(), 8);
    }

    #[test]
    fn http_kind_builds() {
        assert!(BackendKind::Http.build(&cfg()).is_ok());
    }
}
