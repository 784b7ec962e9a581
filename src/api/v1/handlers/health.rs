/*
 * Responsibility
 * - GET /health: process is up AND the pool can reach the database
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{error::AppError, repos::pool, state::AppState};

pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    if let Err(err) = pool::ping(&state.db).await {
        tracing::warn!(error = %err, "health check: database unreachable");
        return Err(AppError::Unavailable);
    }

    Ok((StatusCode::OK, Json(json!({"status": "ok"}))))
}
