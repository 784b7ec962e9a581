/*
 * Responsibility
 * - Application-wide AppError
 * - IntoResponse (HTTP status / JSON error body)
 * - Uniform conversion of repo / auth / partial-update / extractor errors
 */
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;
use crate::services::partial_update::EmptyUpdateError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("{code}: {message}")]
    Unauthorized { code: &'static str, message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("{code}: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("server configuration error")]
    Misconfigured,
    #[error("service unavailable")]
    Unavailable,
    #[error("request timed out")]
    Timeout,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Misconfigured | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::BadRequest { code, message }
            | AppError::Unauthorized { code, message }
            | AppError::Conflict { code, message } => (code, message),
            AppError::NotFound { resource } => ("NOT_FOUND", format!("{resource} not found.")),
            AppError::Misconfigured => (
                "CONFIGURATION_ERROR",
                "server configuration error".into(),
            ),
            AppError::Unavailable => ("SERVICE_UNAVAILABLE", "service unavailable".into()),
            AppError::Timeout => ("REQUEST_TIMEOUT", "request timed out".into()),
            AppError::MethodNotAllowed => ("METHOD_NOT_ALLOWED", "method not allowed".into()),
            AppError::PayloadTooLarge => ("PAYLOAD_TOO_LARGE", "payload too large".into()),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error".into()),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::conflict("CONFLICT", "resource already exists"),
            RepoError::MissingReference => AppError::not_found("referenced resource"),
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        // The secret being unset is our fault, not the client's.
        if e.is_server_fault() {
            return AppError::Misconfigured;
        }
        AppError::Unauthorized {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl From<EmptyUpdateError> for AppError {
    fn from(e: EmptyUpdateError) -> Self {
        AppError::bad_request("EMPTY_UPDATE", e.to_string())
    }
}

// Extractor rejections: the body limit keeps its 413, everything else is a bad request.
fn rejected(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }
    AppError::bad_request("VALIDATION_ERROR", message)
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        rejected(e.status(), e.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        rejected(e.status(), e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        rejected(e.status(), e.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn configuration_error_is_a_server_fault() {
        let (status, body) = body_json(AuthError::Configuration.into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn credential_errors_are_unauthorized_with_distinct_codes() {
        let cases = [
            (AuthError::MissingCredential, "MISSING_CREDENTIAL"),
            (AuthError::MalformedCredential, "MALFORMED_CREDENTIAL"),
            (AuthError::InvalidSignature, "INVALID_SIGNATURE"),
            (AuthError::InvalidClaims("x"), "INVALID_CLAIMS"),
            (AuthError::InvalidSubject, "INVALID_SUBJECT"),
        ];

        for (err, code) in cases {
            let (status, body) = body_json(err.into()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["error"]["code"], code);
        }
    }

    #[tokio::test]
    async fn empty_update_is_a_bad_request() {
        let (status, body) = body_json(EmptyUpdateError.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "EMPTY_UPDATE");
        assert_eq!(body["error"]["message"], "no fields to update");
    }

    #[tokio::test]
    async fn repo_errors_map_to_http_semantics() {
        assert_eq!(AppError::from(RepoError::Conflict).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::from(RepoError::MissingReference).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepoError::Db(sqlx::Error::RowNotFound)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn not_found_message_names_the_resource() {
        let (status, body) = body_json(AppError::not_found("profile")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "profile not found.");
    }
}
