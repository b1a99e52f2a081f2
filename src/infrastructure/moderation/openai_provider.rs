use super::provider::{ScoreError, ScoringProvider};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Scoring provider backed by the OpenAI moderation endpoint.
///
/// Only the `hate` category score is consumed. Missing fields in an otherwise
/// valid response deserialize to 0.0, so a post the provider has no opinion on
/// scores clean rather than erroring into the keyword fallback.
pub struct OpenAiModerationProvider {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    #[serde(default)]
    results: Vec<ModerationResult>,
}

#[derive(Debug, Deserialize)]
struct ModerationResult {
    #[serde(default)]
    category_scores: CategoryScores,
}

#[derive(Debug, Default, Deserialize)]
struct CategoryScores {
    #[serde(default)]
    hate: f64,
}

impl OpenAiModerationProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        })
    }

    /// Set a custom base URL (for proxies and test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl ScoringProvider for OpenAiModerationProvider {
    async fn score(&self, content: &str) -> Result<f64, ScoreError> {
        let response = self
            .http_client
            .post(format!("{}/moderations", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({ "input": content }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScoreError::Timeout
                } else {
                    warn!(error = %e, "moderation request failed");
                    ScoreError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "moderation endpoint returned an error");
            return Err(ScoreError::Api(status.as_u16()));
        }

        let parsed: ModerationResponse = response
            .json()
            .await
            .map_err(|e| ScoreError::Malformed(e.to_string()))?;

        let hate = parsed
            .results
            .first()
            .map(|r| r.category_scores.hate)
            .unwrap_or(0.0);

        debug!(score = hate, "moderation score received");
        Ok(hate)
    }
}
