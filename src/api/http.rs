//! HTTP implementation of [`Backend`].
//!
//! Endpoint layout:
//!   GET  {base}/questions
//!   GET  {base}/peer-questions
//!   POST {base}/access-codes/verify          { "code": ... }
//!   POST {base}/reports                      { "answers": [...], "accessCode": ... }
//!   POST {base}/reports/{token}/peer         { "answers": [...] }
//!   GET  {base}/reports/{id}                 404 -> not found

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tokio::time::Duration;

use crate::api::{AccessCheck, Backend, ReportHandle};
use crate::config::Config;
use crate::question::{Answer, PeerQuestion, Question};
use crate::report::ReportDocument;

pub struct HttpBackend {
    client: Client,
    base: String,
}

impl HttpBackend {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base: cfg.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn fail_on_status(resp: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(anyhow!("{} failed: {} - {}", what, status.as_u16(), body))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_questions(&self) -> Result<Vec<Question>> {
        let resp = self.client.get(self.url("/questions")).send().await?;
        let resp = Self::fail_on_status(resp, "fetch questions").await?;
        Ok(resp.json().await?)
    }

    async fn fetch_peer_questions(&self) -> Result<Vec<PeerQuestion>> {
        let resp = self.client.get(self.url("/peer-questions")).send().await?;
        let resp = Self::fail_on_status(resp, "fetch peer questions").await?;
        Ok(resp.json().await?)
    }

    async fn verify_access_code(&self, code: &str) -> Result<AccessCheck> {
        let resp = self
            .client
            .post(self.url("/access-codes/verify"))
            .json(&json!({ "code": code }))
            .send()
            .await?;
        let resp = Self::fail_on_status(resp, "verify access code").await?;
        Ok(resp.json().await?)
    }

    async fn create_report(&self, answers: &[Answer], access_code: &str) -> Result<ReportHandle> {
        let resp = self
            .client
            .post(self.url("/reports"))
            .json(&json!({ "answers": answers, "accessCode": access_code }))
            .send()
            .await?;
        let resp = Self::fail_on_status(resp, "create report").await?;
        Ok(resp.json().await?)
    }

    async fn submit_peer_assessment(&self, token: &str, answers: &[Answer]) -> Result<()> {
        let resp = self
            .client
            .post(self.url(&format!("/reports/{}/peer", token)))
            .json(&json!({ "answers": answers }))
            .send()
            .await?;
        Self::fail_on_status(resp, "submit peer assessment").await?;
        Ok(())
    }

    async fn get_report_by_id(&self, id: &str) -> Result<Option<ReportDocument>> {
        let resp = self
            .client
            .get(self.url(&format!("/reports/{}", id)))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::fail_on_status(resp, "get report").await?;
        Ok(Some(resp.json().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> HttpBackend {
        let cfg = Config {
            api_base: "http://127.0.0.1:8000/".into(),
            origin: "http://127.0.0.1:5173".into(),
            http_timeout_secs: 5,
            retry_max: 0,
            retry_base_delay_ms: 1,
            retry_max_delay_ms: 1,
        };
        HttpBackend::new(&cfg).unwrap()
    }

    #[test]
    fn base_url_is_normalized() {
        let b = backend();
        assert_eq!(b.url("/questions"), "http://127.0.0.1:8000/questions");
        assert_eq!(
            b.url("/reports/r-1/peer"),
            "http://127.0.0.1:8000/reports/r-1/peer"
        );
    }
}
