/*
 * Responsibility
 * - handler 向け extractor の公開インターフェース
 */
pub mod auth_ctx;
pub mod request;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use request::{AppJson, AppPath, AppQuery};
