use crate::domain::{
    post::errors::DomainError,
    report::{
        entity::{Report, ReportCounts, ReportDetail},
        repository::ReportRepository,
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct SqlxReportRepository {
    pub pool: PgPool,
}

impl SqlxReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for SqlxReportRepository {
    async fn create(&self, report: &Report) -> Result<Report, DomainError> {
        let created = sqlx::query_as::<_, Report>(
            r#"INSERT INTO content_reports (id, post_id, reported_by, reason, is_racism_report)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, post_id, reported_by, reason, is_racism_report, created_at"#,
        )
        .bind(report.id)
        .bind(report.post_id)
        .bind(report.reported_by)
        .bind(&report.reason)
        .bind(report.is_racism_report)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok(created)
    }

    async fn counts_for_post(&self, post_id: Uuid) -> Result<ReportCounts, DomainError> {
        let (total, racism) = sqlx::query_as::<_, (i64, i64)>(
            r#"SELECT COUNT(*), COUNT(*) FILTER (WHERE is_racism_report)
               FROM content_reports WHERE post_id = $1"#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok(ReportCounts { total, racism })
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<ReportDetail>, DomainError> {
        let rows = sqlx::query_as::<_, ReportDetail>(
            r#"SELECT r.id, r.post_id, r.reported_by, u.username AS reporter_username,
                      r.reason, r.is_racism_report, r.created_at
               FROM content_reports r
               JOIN users u ON u.id = r.reported_by
               WHERE r.post_id = $1
               ORDER BY r.created_at DESC"#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok(rows)
    }
}
