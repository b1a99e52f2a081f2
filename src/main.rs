use pillory::{
    application::{
        publish_post::use_case::PublishPostUseCase, report_post::use_case::ReportPostUseCase,
    },
    config::Config,
    infrastructure::{
        audit::sqlx_audit_log::SqlxAuditLog,
        cache::redis_counter_cache::RedisCounterCache,
        database::pool::create_pool,
        moderation::{
            config::ModerationConfig,
            engine::ModerationEngine,
            openai_provider::OpenAiModerationProvider,
            provider::{ScoreError, ScoringProvider},
        },
        notifications::dispatcher::NotificationDispatcher,
        repositories::{
            sqlx_notification_repository::SqlxNotificationRepository,
            sqlx_post_repository::SqlxPostRepository,
            sqlx_report_repository::SqlxReportRepository,
            sqlx_social_repository::SqlxSocialRepository, sqlx_user_repository::SqlxUserRepository,
        },
        security::rate_limiter::RateLimiter,
    },
    presentation::http::{routes::create_router, state::AppState},
};
use async_trait::async_trait;
use http::{HeaderValue, Method, header};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

/// Stand-in provider when no API key is configured: every call errors, so
/// the engine always takes the keyword fallback path.
struct DisabledProvider;

#[async_trait]
impl ScoringProvider for DisabledProvider {
    async fn score(&self, _content: &str) -> Result<f64, ScoreError> {
        Err(ScoreError::Network("no scoring provider configured".into()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Uses RUST_LOG if set, otherwise sensible defaults
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,pillory=debug,tower_http=debug"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;
    let moderation_config = ModerationConfig::load()?;

    let db = create_pool(&config.database_url, config.database_max_connections).await?;
    let mut migrator = sqlx::migrate!("./migrations");
    migrator.set_ignore_missing(config.ignore_missing_migrations);
    migrator.run(&db).await?;

    let redis = redis::Client::open(config.redis_url.clone())?;

    let provider: Arc<dyn ScoringProvider> = match &config.openai_api_key {
        Some(key) => Arc::new(OpenAiModerationProvider::new(
            key.clone(),
            Duration::from_secs(moderation_config.provider_timeout_seconds),
        )?),
        None => {
            tracing::warn!("OPENAI_API_KEY not set; scoring runs on the keyword fallback only");
            Arc::new(DisabledProvider)
        }
    };
    let engine = Arc::new(ModerationEngine::new(provider, moderation_config));

    let posts = Arc::new(SqlxPostRepository::new(db.clone()));
    let users = Arc::new(SqlxUserRepository::new(db.clone()));
    let reports = Arc::new(SqlxReportRepository::new(db.clone()));
    let social = Arc::new(SqlxSocialRepository::new(db.clone()));
    let notification_repo = Arc::new(SqlxNotificationRepository::new(db.clone()));
    let notifier = Arc::new(NotificationDispatcher::new(notification_repo.clone()));

    let state = AppState {
        config: config.clone(),
        posts: posts.clone(),
        users: users.clone(),
        reports: reports.clone(),
        social,
        notification_repo,
        notifier: notifier.clone(),
        audit: Arc::new(SqlxAuditLog::new(db.clone())),
        cache: Arc::new(RedisCounterCache::new(redis.clone())),
        rate_limiter: Arc::new(RateLimiter::new(redis)),
        publish_post: Arc::new(PublishPostUseCase::new(
            posts.clone(),
            users.clone(),
            engine.clone(),
            notifier,
        )),
        report_post: Arc::new(ReportPostUseCase::new(posts, reports, engine)),
    };

    // In production, specify explicit allowed origins from config
    let cors = if cfg!(debug_assertions) {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(vec![
                // TODO: Load allowed origins from config
            ]))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    };

    let app = create_router(state)
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("pillory listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, initiating graceful shutdown");
        }
    }
}
