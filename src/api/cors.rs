//! CORS policy middleware
//!
//! The allow-list is a configured list of origins. An empty list allows every
//! origin (the request's own origin is echoed). With a non-empty list, an
//! exact match is echoed, and any other origin is answered with the first
//! allow-listed origin rather than a rejection, leaving the mismatch for the
//! browser's own origin comparison to refuse. Requests without an `Origin`
//! header pass through untouched.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::AppState;

/// Resolve the `Access-Control-Allow-Origin` value for a request origin.
///
/// Returns `None` when the request carries no origin (not a CORS request).
pub fn resolve_origin(allow_list: &[String], request_origin: Option<&str>) -> Option<String> {
    let origin = request_origin?;
    if allow_list.is_empty() {
        return Some(origin.to_string());
    }
    if allow_list.iter().any(|allowed| allowed == origin) {
        return Some(origin.to_string());
    }
    // permissive fallback: echo the first allow-listed origin
    Some(allow_list[0].clone())
}

/// CORS middleware
///
/// Answers preflight `OPTIONS` requests directly and decorates every
/// cross-origin response with the resolved allow-origin header.
pub async fn cors_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let resolved = resolve_origin(&state.config.allowed_origins, origin.as_deref());
    let is_preflight = request.method() == Method::OPTIONS && origin.is_some();

    let mut response = if is_preflight {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    if let Some(allow) = resolved {
        // skip decoration if the origin is not a legal header value
        if let Ok(value) = HeaderValue::from_str(&allow) {
            let headers = response.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
            if is_preflight {
                headers.insert(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("GET, POST, OPTIONS"),
                );
                headers.insert(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("authorization, content-type"),
                );
            }
        }
    }

    response
}
