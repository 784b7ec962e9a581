/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth is per-route (protected router only); the rest wraps the whole app
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
