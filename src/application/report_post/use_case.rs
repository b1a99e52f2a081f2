use crate::{
    application::report_post::dto::ReportPostRequest,
    domain::{
        post::{entity::Post, errors::DomainError, repository::PostRepository, value_objects::ReportReason},
        report::{entity::Report, repository::ReportRepository},
    },
    infrastructure::moderation::engine::ModerationEngine,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Files a report against a post and re-blends the post's racism score from
/// the full report set.
pub struct ReportPostUseCase {
    posts: Arc<dyn PostRepository>,
    reports: Arc<dyn ReportRepository>,
    engine: Arc<ModerationEngine>,
}

impl ReportPostUseCase {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        reports: Arc<dyn ReportRepository>,
        engine: Arc<ModerationEngine>,
    ) -> Self {
        Self {
            posts,
            reports,
            engine,
        }
    }

    #[instrument(skip(self, request), fields(post_id = %post_id, reporter_id = %reporter_id))]
    pub async fn execute(
        &self,
        reporter_id: Uuid,
        post_id: Uuid,
        request: ReportPostRequest,
    ) -> Result<Post, DomainError> {
        let reason = ReportReason::new(request.reason)
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Post not found".into()))?;

        let report = Report::new(post.id, reporter_id, reason.value, request.is_racism_report);
        self.reports.create(&report).await?;

        let rescored = self.recalculate(&post).await?;
        info!(
            post_id = %rescored.id,
            score = rescored.racism_score,
            hidden = rescored.is_hidden,
            "Report filed, score re-blended"
        );
        Ok(rescored)
    }

    /// Re-blends the post score from the current report tallies.
    ///
    /// The ratio is recomputed from scratch on every call, never carried
    /// forward. With zero reports there is nothing to blend and the stored
    /// row is left untouched, so repeated calls against an unchanged empty
    /// report set keep the score bit-identical.
    pub async fn recalculate(&self, post: &Post) -> Result<Post, DomainError> {
        let counts = self.reports.counts_for_post(post.id).await?;
        if counts.total == 0 {
            return Ok(post.clone());
        }

        let ratio = counts.racism as f64 / counts.total as f64;
        let new_score = self.engine.blend(post.racism_score, ratio);

        self.posts
            .apply_rescore(post.id, new_score, self.engine.hides(new_score))
            .await
    }
}
