/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: the one pool built at startup
 *   - auth: the read-only token authenticator
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::services::auth::TokenAuthenticator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub auth: Arc<TokenAuthenticator>,
}

impl AppState {
    pub fn new(db: PgPool, auth: Arc<TokenAuthenticator>) -> Self {
        Self { db, auth }
    }
}
