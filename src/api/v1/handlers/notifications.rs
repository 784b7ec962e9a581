/*
 * Responsibility
 * - The caller's notifications: list, update one (sparse), mark one / all as read
 * - Notifications addressed to someone else are indistinguishable from missing ones
 */
use axum::{
    Json,
    extract::State,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::{
            common::MessageResponse,
            notifications::{NotificationResponse, UpdateNotificationRequest},
        },
        extractors::{AppJson, AppPath, AuthCtxExtractor},
    },
    error::AppError,
    repos::notification_repo,
    services::partial_update::build_update_set,
    state::AppState,
};

pub async fn list_notifications(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let rows = notification_repo::list_for_recipient(&state.db, ctx.user_id).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

async fn apply(
    state: &AppState,
    recipient: Uuid,
    notification_id: Uuid,
    req: &UpdateNotificationRequest,
) -> Result<NotificationResponse, AppError> {
    let set = build_update_set(req, notification_repo::UPDATABLE_FIELDS)?;

    let row = notification_repo::apply_update(&state.db, notification_id, recipient, &set)
        .await?
        .ok_or_else(|| AppError::not_found("notification"))?;

    Ok(row.into())
}

pub async fn update_notification(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    AppPath(notification_id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateNotificationRequest>,
) -> Result<Json<NotificationResponse>, AppError> {
    Ok(Json(apply(&state, ctx.user_id, notification_id, &req).await?))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    AppPath(notification_id): AppPath<Uuid>,
) -> Result<Json<NotificationResponse>, AppError> {
    let req = UpdateNotificationRequest::mark_read();
    Ok(Json(apply(&state, ctx.user_id, notification_id, &req).await?))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<MessageResponse>, AppError> {
    let count = notification_repo::mark_all_read(&state.db, ctx.user_id).await?;

    tracing::info!(user_id = %ctx.user_id, count, "notifications marked as read");
    Ok(Json(MessageResponse::new(format!(
        "{count} notifications marked as read"
    ))))
}
