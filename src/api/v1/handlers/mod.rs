pub mod follows;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod profiles;
pub mod search;
pub mod timeline;

use crate::error::AppError;

/// Map a DTO validation message onto the uniform 400 body.
pub(crate) fn invalid(message: &'static str) -> AppError {
    AppError::bad_request("VALIDATION_ERROR", message)
}
