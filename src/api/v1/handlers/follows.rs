/*
 * Responsibility
 * - POST/DELETE /follow for the caller
 * - GET /followers, /following for any user
 */
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use super::invalid;
use crate::{
    api::v1::{
        dto::{
            common::{MessageResponse, ProfileSummary},
            follows::{FollowRequest, FollowResponse, UserIdQuery},
        },
        extractors::{AppJson, AppQuery, AuthCtxExtractor},
    },
    error::AppError,
    repos::{error::RepoError, follow_repo, profile_repo},
    state::AppState,
};

pub async fn follow(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    AppJson(req): AppJson<FollowRequest>,
) -> Result<(StatusCode, Json<FollowResponse>), AppError> {
    let target = req.target().map_err(invalid)?;

    if target == ctx.user_id {
        return Err(AppError::bad_request("SELF_FOLLOW", "cannot follow yourself"));
    }
    if !profile_repo::exists(&state.db, target).await? {
        return Err(AppError::not_found("profile"));
    }

    let row = follow_repo::create(&state.db, ctx.user_id, target)
        .await
        .map_err(|e| match e {
            RepoError::Conflict => {
                AppError::conflict("ALREADY_FOLLOWING", "already following this user")
            }
            other => other.into(),
        })?;

    tracing::info!(follower = %ctx.user_id, following = %target, "follow created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn unfollow(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    AppJson(req): AppJson<FollowRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let target = req.target().map_err(invalid)?;

    let removed = follow_repo::delete(&state.db, ctx.user_id, target).await?;
    tracing::debug!(follower = %ctx.user_id, following = %target, removed, "unfollow");

    Ok(Json(MessageResponse::new("Successfully unfollowed")))
}

pub async fn list_followers(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserIdQuery>,
) -> Result<Json<Vec<ProfileSummary>>, AppError> {
    let user_id = query.user_id().map_err(invalid)?;

    let rows = follow_repo::followers(&state.db, user_id).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_following(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserIdQuery>,
) -> Result<Json<Vec<ProfileSummary>>, AppError> {
    let user_id = query.user_id().map_err(invalid)?;

    let rows = follow_repo::following(&state.db, user_id).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
