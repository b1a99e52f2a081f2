use super::traits::AuditLog;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

pub struct SqlxAuditLog {
    pub pool: PgPool,
}

impl SqlxAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for SqlxAuditLog {
    async fn record(
        &self,
        admin_id: Uuid,
        action: &str,
        post_id: Option<Uuid>,
        detail: Option<serde_json::Value>,
    ) {
        let result = sqlx::query(
            r#"INSERT INTO admin_audit_logs (id, admin_id, action, post_id, detail)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(Uuid::now_v7())
        .bind(admin_id)
        .bind(action)
        .bind(post_id)
        .bind(detail)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            warn!(action, admin_id = %admin_id, error = %e, "Failed to write audit log entry");
        }
    }
}
