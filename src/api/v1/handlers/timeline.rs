/*
 * Responsibility
 * - GET /timeline: newest posts from everyone the caller follows
 */
use axum::{
    Json,
    extract::State,
};

use crate::{
    api::v1::{
        dto::{common::Pagination, posts::PostResponse},
        extractors::{AppQuery, AuthCtxExtractor},
    },
    error::AppError,
    repos::post_repo,
    state::AppState,
};

pub async fn timeline(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    AppQuery(page): AppQuery<Pagination>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let (limit, offset) = page.resolve();

    let rows = post_repo::timeline(&state.db, ctx.user_id, limit, offset).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
