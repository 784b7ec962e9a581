/*
 * Responsibility
 * - Build the PgPool exactly once at startup (app::run) and hand it to AppState
 * - Initialisation failure is a typed error returned to main, never a process abort
 */
use std::str::FromStr;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use thiserror::Error;

use crate::config::DbConfig;

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("invalid database url")]
    InvalidUrl(#[source] sqlx::Error),
    #[error("failed to connect to database")]
    Connect(#[source] sqlx::Error),
}

pub fn connect_options(config: &DbConfig) -> Result<PgConnectOptions, DbInitError> {
    let mut options = PgConnectOptions::from_str(&config.url).map_err(DbInitError::InvalidUrl)?;
    if config.disable_statement_cache {
        options = options.statement_cache_capacity(0);
    }
    Ok(options)
}

pub fn pool_options(config: &DbConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(0)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
}

pub async fn connect(config: &DbConfig) -> Result<PgPool, DbInitError> {
    let options = connect_options(config)?;
    let pool = pool_options(config)
        .connect_with(options)
        .await
        .map_err(DbInitError::Connect)?;

    tracing::info!(
        max_connections = config.max_connections,
        statement_cache = !config.disable_statement_cache,
        "database pool established"
    );

    Ok(pool)
}

pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
