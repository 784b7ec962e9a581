/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Hand the caller identity established by the access middleware to handlers
 * - axum plumbing lives in core, the type itself in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
