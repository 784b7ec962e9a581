/*
 * Responsibility
 * - Load settings from the environment (DATABASE_URL, CORS allow-list, JWT secret, pool sizing)
 * - Validate them up front (startup fails on missing/invalid values)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Connection pool settings. Sizing is a deployment concern, not a code constant.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub max_lifetime: Duration,
    // PgBouncer in transaction mode cannot cope with named prepared statements.
    pub disable_statement_cache: bool,
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub db: DbConfig,

    pub jwt_secret: String,
    pub auth_audience: Option<String>,
    pub auth_issuer: Option<String>,
    pub auth_subject_claim: String,
    pub access_token_leeway_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the secret or the connection string (it may embed a password).
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("db_max_connections", &self.db.max_connections)
            .field("jwt_secret_set", &!self.jwt_secret.is_empty())
            .field("auth_audience", &self.auth_audience)
            .field("auth_issuer", &self.auth_issuer)
            .field("auth_subject_claim", &self.auth_subject_claim)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or("PORT", non_empty("PORT"), 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(non_empty("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        // DIRECT_URL bypasses the pooler and is preferred when both are set.
        let (url_key, database_url) = match non_empty("DIRECT_URL") {
            Some(url) => ("DIRECT_URL", url),
            None => (
                "DATABASE_URL",
                non_empty("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            ),
        };
        validate_database_url(url_key, &database_url)?;

        let max_connections: u32 =
            parse_or("DB_MAX_CONNECTIONS", non_empty("DB_MAX_CONNECTIONS"), 5)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid("DB_MAX_CONNECTIONS"));
        }
        let acquire_timeout_seconds: u64 = parse_or(
            "DB_ACQUIRE_TIMEOUT_SECONDS",
            non_empty("DB_ACQUIRE_TIMEOUT_SECONDS"),
            5,
        )?;
        let max_lifetime_seconds: u64 = parse_or(
            "DB_MAX_LIFETIME_SECONDS",
            non_empty("DB_MAX_LIFETIME_SECONDS"),
            300,
        )?;
        let disable_statement_cache = parse_bool(
            "DB_DISABLE_STATEMENT_CACHE",
            non_empty("DB_DISABLE_STATEMENT_CACHE"),
        )?;

        // An empty secret is not a startup error: public routes keep working and
        // protected routes answer with a server-side configuration error.
        let jwt_secret = lookup("SUPABASE_JWT_SECRET").unwrap_or_default();

        let auth_audience = non_empty("AUTH_AUDIENCE");
        let auth_issuer = non_empty("AUTH_ISSUER");
        let auth_subject_claim = non_empty("AUTH_SUBJECT_CLAIM").unwrap_or_else(|| "sub".into());

        let access_token_leeway_seconds: u64 = parse_or(
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            non_empty("ACCESS_TOKEN_LEEWAY_SECONDS"),
            60,
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            db: DbConfig {
                url: database_url,
                max_connections,
                acquire_timeout: Duration::from_secs(acquire_timeout_seconds),
                max_lifetime: Duration::from_secs(max_lifetime_seconds),
                disable_statement_cache,
            },
            jwt_secret,
            auth_audience,
            auth_issuer,
            auth_subject_claim,
            access_token_leeway_seconds,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_bool(key: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid(key)),
        },
    }
}

fn validate_database_url(key: &'static str, raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|_| ConfigError::Invalid(key))?;
    match parsed.scheme() {
        "postgres" | "postgresql" => Ok(()),
        _ => Err(ConfigError::Invalid(key)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/app")]))
                .unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.db.max_connections, 5);
        assert_eq!(config.db.acquire_timeout, Duration::from_secs(5));
        assert!(!config.db.disable_statement_cache);
        assert!(config.jwt_secret.is_empty());
        assert_eq!(config.auth_audience, None);
        assert_eq!(config.auth_subject_claim, "sub");
        assert_eq!(config.access_token_leeway_seconds, 60);
    }

    #[test]
    fn direct_url_wins_over_database_url() {
        let config = Config::from_lookup(lookup_from(&[
            ("DIRECT_URL", "postgresql://db.internal:5432/app"),
            ("DATABASE_URL", "postgres://pooler:6543/app"),
        ]))
        .unwrap();

        assert_eq!(config.db.url, "postgresql://db.internal:5432/app");
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "mysql://localhost/app")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("DATABASE_URL"));
    }

    #[test]
    fn invalid_numbers_fail_instead_of_falling_back() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("DB_MAX_CONNECTIONS", "many"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("DB_MAX_CONNECTIONS"));

        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("DB_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn parses_auth_and_cors_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("APP_ENV", "PROD"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("SUPABASE_JWT_SECRET", "s3cret"),
            ("AUTH_AUDIENCE", "authenticated"),
            ("DB_DISABLE_STATEMENT_CACHE", "true"),
        ]))
        .unwrap();

        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.auth_audience.as_deref(), Some("authenticated"));
        assert!(config.db.disable_statement_cache);
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://user:pw@localhost/app"),
            ("SUPABASE_JWT_SECRET", "super-secret-value"),
        ]))
        .unwrap();

        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret-value"));
        assert!(!printed.contains("pw@"));
    }
}
