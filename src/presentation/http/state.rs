use crate::{
    application::{publish_post::use_case::PublishPostUseCase, report_post::use_case::ReportPostUseCase},
    config::Config,
    domain::{
        notification::repository::NotificationRepository, post::repository::PostRepository,
        report::repository::ReportRepository, social::repository::SocialRepository,
        user::repository::UserRepository,
    },
    infrastructure::{
        audit::traits::AuditLog, cache::traits::CounterCache,
        notifications::dispatcher::NotificationDispatcher, security::rate_limiter::RateLimiter,
    },
};
use std::sync::Arc;

/// Shared handler state. Everything behind a trait object so the whole
/// router runs against in-memory doubles in tests.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub social: Arc<dyn SocialRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub notifier: Arc<NotificationDispatcher>,
    pub audit: Arc<dyn AuditLog>,
    pub cache: Arc<dyn CounterCache>,
    pub rate_limiter: Arc<RateLimiter>,
    pub publish_post: Arc<PublishPostUseCase>,
    pub report_post: Arc<ReportPostUseCase>,
}
