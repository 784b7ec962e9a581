use std::borrow::Cow;
use std::fmt;

use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::services::auth::error::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

// Only the symmetric HMAC family is ever accepted, whatever the token header claims.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Decoded JWT payload. Anything that is not a JSON object is rejected while decoding.
pub type ClaimSet = Map<String, Value>;

/// HMAC bearer-token verifier shared by every protected route.
///
/// The secret is bound once at startup; the value is read-only afterwards so a
/// single instance can serve any number of concurrent requests.
#[derive(Clone)]
pub struct TokenAuthenticator {
    // None when the secret is unset: every call then fails with a configuration error.
    decoding_key: Option<DecodingKey>,
    validation: Validation,
    subject_claim: Cow<'static, str>,
}

impl fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenAuthenticator")
            .field("secret_configured", &self.decoding_key.is_some())
            .field("validation", &self.validation)
            .field("subject_claim", &self.subject_claim)
            .finish()
    }
}

impl TokenAuthenticator {
    pub fn new(secret: &str) -> Self {
        let decoding_key =
            (!secret.is_empty()).then(|| DecodingKey::from_secret(secret.as_bytes()));

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        // `exp` is checked when present but not demanded.
        validation.required_spec_claims.clear();
        validation.validate_aud = false;

        Self {
            decoding_key,
            validation,
            subject_claim: Cow::Borrowed("sub"),
        }
    }

    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    pub fn with_leeway(mut self, leeway_seconds: u64) -> Self {
        self.validation.leeway = leeway_seconds;
        self
    }

    pub fn with_subject_claim(mut self, claim: impl Into<Cow<'static, str>>) -> Self {
        self.subject_claim = claim.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.decoding_key.is_some()
    }

    /// Verify the `Authorization: Bearer <jwt>` header and return the caller's user id.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let key = self.decoding_key.as_ref().ok_or(AuthError::Configuration)?;
        let token = bearer_token(headers)?;
        let claims = self.verify(token, key)?;
        self.subject(&claims)
    }

    fn verify(&self, token: &str, key: &DecodingKey) -> Result<ClaimSet, AuthError> {
        let header = jsonwebtoken::decode_header(token).map_err(|_| AuthError::InvalidSignature)?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            return Err(AuthError::InvalidSignature);
        }

        let data = jsonwebtoken::decode::<ClaimSet>(token, key, &self.validation)
            .map_err(classify_decode_error)?;

        Ok(data.claims)
    }

    fn subject(&self, claims: &ClaimSet) -> Result<Uuid, AuthError> {
        let sub = claims
            .get(self.subject_claim.as_ref())
            .and_then(Value::as_str)
            .ok_or(AuthError::InvalidClaims(
                "subject claim is missing or not a string",
            ))?;

        Uuid::parse_str(sub).map_err(|_| AuthError::InvalidSubject)
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let raw = match headers.get(header::AUTHORIZATION) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(AuthError::MissingCredential),
    };

    let value = raw.to_str().map_err(|_| AuthError::MalformedCredential)?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedCredential)?;

    // Exactly one space after the scheme. Whatever follows is the signature check's problem.
    if token.is_empty() || token.starts_with(char::is_whitespace) {
        return Err(AuthError::MalformedCredential);
    }

    Ok(token)
}

// The header was already parsed before `decode` runs, so a JSON failure here can
// only come from the payload.
fn classify_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::Json(_) => AuthError::InvalidClaims("claim set is not a JSON object"),
        ErrorKind::ExpiredSignature => AuthError::InvalidClaims("token has expired"),
        ErrorKind::ImmatureSignature => AuthError::InvalidClaims("token is not valid yet"),
        ErrorKind::InvalidAudience => AuthError::InvalidClaims("unexpected audience"),
        ErrorKind::InvalidIssuer => AuthError::InvalidClaims("unexpected issuer"),
        ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims("required claim is missing"),
        // e.g. `"exp": "tomorrow"`; the signature already checked out.
        ErrorKind::InvalidClaimFormat(_) => AuthError::InvalidClaims("malformed registered claim"),
        _ => AuthError::InvalidSignature,
    }
}
