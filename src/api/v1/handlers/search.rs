/*
 * Responsibility
 * - GET /search-users?q=: substring match on username / full name
 */
use axum::{
    Json,
    extract::State,
};

use super::invalid;
use crate::{
    api::v1::{
        dto::profiles::{ProfileResponse, SearchQuery},
        extractors::AppQuery,
    },
    error::AppError,
    repos::profile_repo,
    state::AppState,
};

pub const SEARCH_LIMIT: i64 = 50;

pub async fn search_users(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| invalid("search query 'q' is required"))?;

    let rows = profile_repo::search(&state.db, q, SEARCH_LIMIT).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
