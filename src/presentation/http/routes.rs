use super::{
    handlers::{admin, auth, community, health, notifications, posts, profiles, social},
    middleware::logging::logging_middleware,
    middleware::moderator::require_moderator,
    middleware::rate_limit::rate_limit_middleware,
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};

pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/api/v1/admin/posts", get(admin::get_moderation_queue))
        .route(
            "/api/v1/admin/posts/{id}",
            get(admin::get_post_detail)
                .patch(admin::edit_post)
                .delete(admin::delete_post),
        )
        .route("/api/v1/admin/posts/{id}/approve", post(admin::approve_post))
        .route("/api/v1/admin/posts/{id}/hide", post(admin::hide_post))
        .route("/api/v1/admin/posts/{id}/unhide", post(admin::unhide_post))
        .route(
            "/api/v1/admin/users/{username}/role",
            put(admin::set_user_role),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_moderator,
        ));

    // Only post creation is rate limited; report submission deliberately
    // is not.
    let publish_routes = Router::new()
        .route("/api/v1/posts", post(posts::create_post))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Posts
        .route("/api/v1/posts", get(posts::get_feed))
        .route("/api/v1/posts/{id}", get(posts::get_post))
        .route("/api/v1/posts/{id}/view", post(posts::record_view))
        .route("/api/v1/posts/{id}/report", post(posts::report_post))
        // Social
        .route(
            "/api/v1/posts/{id}/like",
            post(social::toggle_like).get(social::like_status),
        )
        // Community
        .route("/api/v1/leaderboard", get(community::get_leaderboard))
        .route("/api/v1/profiles/{username}", get(profiles::get_profile))
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/me", get(auth::me))
        // Notifications
        .route("/api/v1/notifications", get(notifications::list_notifications))
        .route(
            "/api/v1/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route(
            "/api/v1/notifications/{id}/read",
            post(notifications::mark_read),
        )
        .route(
            "/api/v1/notifications/read-all",
            post(notifications::mark_all_read),
        )
        // Post creation (rate limited)
        .merge(publish_routes)
        // Moderation surface (JWT role guard)
        .merge(admin_routes)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
