use async_trait::async_trait;
use uuid::Uuid;

/// Write-only trail of moderator actions.
///
/// Recording is failure-tolerant: implementations log write errors and
/// return normally, so a broken trail never blocks moderation itself.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(
        &self,
        admin_id: Uuid,
        action: &str,
        post_id: Option<Uuid>,
        detail: Option<serde_json::Value>,
    );
}
