use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    domain::notification::entity::Notification,
    presentation::http::{
        errors::AppError, middleware::user::decode_required_user_claims, state::AppState,
    },
};

const LATEST_LIMIT: i64 = 15;

pub async fn list_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>, AppError> {
    let claims = decode_required_user_claims(&headers, &state.config.jwt_secret)?;
    let items = state
        .notification_repo
        .list_latest(claims.user_id()?, LATEST_LIMIT)
        .await?;
    Ok(Json(items))
}

pub async fn unread_count(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = decode_required_user_claims(&headers, &state.config.jwt_secret)?;
    let count = state
        .notification_repo
        .unread_count(claims.user_id()?)
        .await?;
    Ok(Json(json!({ "unread_count": count })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = decode_required_user_claims(&headers, &state.config.jwt_secret)?;
    let updated = state
        .notification_repo
        .mark_read(claims.user_id()?, id)
        .await?;

    if !updated {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }
    Ok(Json(json!({ "read": true })))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = decode_required_user_claims(&headers, &state.config.jwt_secret)?;
    let updated = state
        .notification_repo
        .mark_all_read(claims.user_id()?)
        .await?;
    Ok(Json(json!({ "marked_read": updated })))
}
