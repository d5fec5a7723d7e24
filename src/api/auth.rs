//! Bearer-token authentication middleware
//!
//! A deployment configures at most one token. When none is configured the
//! check is disabled entirely. When one is configured, write requests must
//! present `Authorization: Bearer <token>` with the exact configured value;
//! read (GET) requests are checked only if `protect_reads` is set.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::Error;
use crate::AppState;

/// Authentication middleware
///
/// Rejections carry no detail beyond "Unauthorized"; the presented token is
/// never logged.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    // No configured token disables auth checking entirely
    let Some(expected) = state.config.api_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    // Reads stay open unless the deployment protects them
    if request.method() == Method::GET && !state.config.protect_reads {
        return Ok(next.run(request).await);
    }

    match extract_bearer_token(request.headers()) {
        Some(presented) if presented == expected => {}
        Some(_) => {
            warn!(
                "rejected {} {}: incorrect bearer token",
                request.method(),
                request.uri().path()
            );
            return Err(Error::Unauthorized);
        }
        None => {
            warn!(
                "rejected {} {}: missing bearer token",
                request.method(),
                request.uri().path()
            );
            return Err(Error::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}
