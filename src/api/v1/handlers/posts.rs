/*
 * Responsibility
 * - /posts 系 CRUD handler
 * - Ownership is checked by the repo (WHERE user_id = caller); someone else's post is a 404
 */
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use uuid::Uuid;

use super::invalid;
use crate::{
    api::v1::{
        dto::posts::{CreatePostRequest, PostListQuery, PostResponse, UpdatePostRequest},
        extractors::{AppJson, AppPath, AppQuery, AuthCtxExtractor},
    },
    error::AppError,
    repos::post_repo,
    services::partial_update::build_update_set,
    state::AppState,
};

pub async fn list_posts(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PostListQuery>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let author = query.author().map_err(invalid)?;
    let (limit, offset) = query.pagination().resolve();

    let rows = post_repo::list(&state.db, author, limit, offset).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    AppJson(req): AppJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    req.validate().map_err(invalid)?;

    let row = post_repo::create(&state.db, ctx.user_id, &req.content).await?;

    tracing::info!(post_id = %row.id, author = %ctx.user_id, "post created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_post(
    State(state): State<AppState>,
    AppPath(post_id): AppPath<Uuid>,
) -> Result<Json<PostResponse>, AppError> {
    let row = post_repo::get(&state.db, post_id)
        .await?
        .ok_or_else(|| AppError::not_found("post"))?;

    Ok(Json(row.into()))
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    AppPath(post_id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    req.validate().map_err(invalid)?;

    let set = build_update_set(&req, post_repo::UPDATABLE_FIELDS)?;

    let row = post_repo::apply_update(&state.db, post_id, ctx.user_id, &set)
        .await?
        .ok_or_else(|| AppError::not_found("post"))?;

    Ok(Json(row.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    AppPath(post_id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = post_repo::delete(&state.db, post_id, ctx.user_id).await?;

    if deleted {
        tracing::info!(post_id = %post_id, "post deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("post"))
    }
}
