use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of an external scoring call. Every variant is recoverable:
/// callers fall back to the local keyword table instead of failing the post.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("scoring provider unreachable: {0}")]
    Network(String),

    #[error("scoring provider timed out")]
    Timeout,

    #[error("scoring provider returned HTTP {0}")]
    Api(u16),

    #[error("scoring provider response malformed: {0}")]
    Malformed(String),
}

/// Scores text for racist content on a 0.0 to 1.0 scale.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoringProvider: Send + Sync {
    async fn score(&self, content: &str) -> Result<f64, ScoreError>;
}
