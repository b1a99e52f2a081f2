use super::entity::{Report, ReportCounts, ReportDetail};
use crate::domain::post::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, report: &Report) -> Result<Report, DomainError>;
    async fn counts_for_post(&self, post_id: Uuid) -> Result<ReportCounts, DomainError>;
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<ReportDetail>, DomainError>;
}
