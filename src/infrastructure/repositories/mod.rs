pub mod sqlx_notification_repository;
pub mod sqlx_post_repository;
pub mod sqlx_report_repository;
pub mod sqlx_social_repository;
pub mod sqlx_user_repository;
