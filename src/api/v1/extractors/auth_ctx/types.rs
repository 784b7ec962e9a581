/*
 * Responsibility
 * - The authenticated context a handler sees
 * - The access middleware verifies the bearer token and stores this in request extensions;
 *   handlers only ever receive this type, never the token
 */

use uuid::Uuid;

/// Context attached to an authenticated request.
///
/// `user_id` is the verified `sub` claim. It is derived per request and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Uuid,
}

impl AuthCtx {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
