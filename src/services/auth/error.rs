use thiserror::Error;

/// Why a request could not be authenticated.
///
/// Every variant is terminal for the request. Only `Configuration` is a
/// server-side fault; the rest describe the credential the client presented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("server configuration error: JWT secret is not set")]
    Configuration,

    #[error("missing Authorization header")]
    MissingCredential,

    #[error("invalid Authorization header format, must be 'Bearer <token>'")]
    MalformedCredential,

    #[error("token signature could not be verified")]
    InvalidSignature,

    #[error("invalid token claims: {0}")]
    InvalidClaims(&'static str),

    #[error("subject claim is not a valid user id")]
    InvalidSubject,
}

impl AuthError {
    pub fn is_server_fault(&self) -> bool {
        matches!(self, Self::Configuration)
    }

    /// Stable machine-readable code used in error bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::MalformedCredential => "MALFORMED_CREDENTIAL",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidClaims(_) => "INVALID_CLAIMS",
            Self::InvalidSubject => "INVALID_SUBJECT",
        }
    }
}
