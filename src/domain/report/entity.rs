use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A community report filed against a post.
///
/// Reports are immutable once created; there is no update or delete path.
/// The `is_racism_report` flag feeds the report ratio that the moderation
/// engine blends into the post score.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct Report {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reported_by: Uuid,
    pub reason: String,
    pub is_racism_report: bool,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(post_id: Uuid, reported_by: Uuid, reason: String, is_racism_report: bool) -> Self {
        Self {
            id: Uuid::now_v7(),
            post_id,
            reported_by,
            reason,
            is_racism_report,
            created_at: Utc::now(),
        }
    }
}

/// Report joined with reporter identity, as served in the admin detail view.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct ReportDetail {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reported_by: Uuid,
    pub reporter_username: String,
    pub reason: String,
    pub is_racism_report: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-post report tallies, recomputed from scratch on every rescore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportCounts {
    pub total: i64,
    pub racism: i64,
}
