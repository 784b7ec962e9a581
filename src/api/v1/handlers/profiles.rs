/*
 * Responsibility
 * - /profile (caller's own profile: read / create / sparse update)
 * - /profiles/{username} (public lookup), /check-username
 */
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use super::invalid;
use crate::{
    api::v1::{
        dto::profiles::{
            CreateProfileRequest, ProfileResponse, UpdateProfileRequest, UsernameAvailability,
            UsernameQuery,
        },
        extractors::{AppJson, AppPath, AppQuery, AuthCtxExtractor},
    },
    error::AppError,
    repos::{error::RepoError, profile_repo},
    services::partial_update::build_update_set,
    state::AppState,
};

pub async fn check_username(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UsernameQuery>,
) -> Result<Json<UsernameAvailability>, AppError> {
    let username = query
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| invalid("username is required"))?;

    let taken = profile_repo::username_taken(&state.db, username).await?;

    Ok(Json(UsernameAvailability { available: !taken }))
}

pub async fn get_own_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<ProfileResponse>, AppError> {
    let row = profile_repo::get(&state.db, ctx.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("profile"))?;

    Ok(Json(row.into()))
}

pub async fn create_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    AppJson(req): AppJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    req.validate().map_err(invalid)?;

    let row = profile_repo::create(
        &state.db,
        ctx.user_id,
        req.username.trim(),
        req.full_name.as_deref(),
    )
    .await
    .map_err(|e| match e {
        RepoError::Conflict => {
            AppError::conflict("PROFILE_CONFLICT", "profile already exists or username is taken")
        }
        other => other.into(),
    })?;

    tracing::info!(user_id = %row.id, "profile created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    req.validate().map_err(invalid)?;

    let set = build_update_set(&req, profile_repo::UPDATABLE_FIELDS)?;

    let row = profile_repo::apply_update(&state.db, ctx.user_id, &set)
        .await
        .map_err(|e| match e {
            RepoError::Conflict if set.contains_column("username") => {
                AppError::conflict("USERNAME_TAKEN", "username is already taken")
            }
            other => other.into(),
        })?
        .ok_or_else(|| AppError::not_found("profile"))?;

    tracing::info!(user_id = %row.id, fields = set.len(), "profile updated");
    Ok(Json(row.into()))
}

pub async fn get_profile_by_username(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let row = profile_repo::get_by_username(&state.db, username.trim())
        .await?
        .ok_or_else(|| AppError::not_found("profile"))?;

    Ok(Json(row.into()))
}
