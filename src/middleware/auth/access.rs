//! Bearer token verification → `AuthCtx` in request extensions.
//!
//! Every protected route runs the `TokenAuthenticator` before its handler.
//! Handlers never see the token, only the caller's `user_id` through `AuthCtxExtractor`.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Require a valid bearer token on every route registered on `router` so far.
///
/// Uses `route_layer`, so unmatched paths still answer 404 rather than 401, and
/// the routes stay mergeable with a public router sharing the same paths.
///
/// ```ignore
/// let protected = middleware::auth::access::apply(protected_routes(), state.clone());
/// let v1 = public_routes().merge(protected);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = match state.auth.authenticate(req.headers()) {
        Ok(user_id) => user_id,
        Err(err) if err.is_server_fault() => {
            tracing::error!(code = err.code(), "authenticator is not configured");
            return Err(err.into());
        }
        Err(err) => {
            // Kind only. The token itself never reaches the logs.
            tracing::warn!(code = err.code(), "access token rejected");
            return Err(err.into());
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(user_id));

    Ok(next.run(req).await)
}
