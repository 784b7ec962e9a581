//! Factory: build the shared `TokenAuthenticator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::TokenAuthenticator;

pub fn build_authenticator(config: &Config) -> Arc<TokenAuthenticator> {
    let mut auth = TokenAuthenticator::new(&config.jwt_secret)
        .with_leeway(config.access_token_leeway_seconds)
        .with_subject_claim(config.auth_subject_claim.clone());

    if let Some(audience) = &config.auth_audience {
        auth = auth.with_audience(audience);
    }
    if let Some(issuer) = &config.auth_issuer {
        auth = auth.with_issuer(issuer);
    }

    if !auth.is_configured() {
        tracing::warn!(
            "SUPABASE_JWT_SECRET is not set; protected routes will answer with a configuration error"
        );
    }

    Arc::new(auth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &'static [(&'static str, &'static str)]) -> Config {
        Config::from_lookup(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    #[test]
    fn unset_secret_builds_an_unconfigured_authenticator() {
        let auth = build_authenticator(&config(&[("DATABASE_URL", "postgres://localhost/app")]));
        assert!(!auth.is_configured());
    }

    #[test]
    fn secret_and_claim_settings_are_applied() {
        let auth = build_authenticator(&config(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("SUPABASE_JWT_SECRET", "s3cret"),
            ("AUTH_SUBJECT_CLAIM", "user_id"),
        ]));

        assert!(auth.is_configured());
        assert!(format!("{auth:?}").contains("user_id"));
    }
}
