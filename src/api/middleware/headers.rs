//! Uniform response headers for handler routes.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;

/// Methods advertised in `Access-Control-Allow-Methods`.
pub const ALLOWED_METHODS: &str = "POST, GET, OPTIONS, HEAD";

/// Value of `Access-Control-Max-Age`, in seconds.
pub const CORS_MAX_AGE: &str = "1000";

/// Headers set on every handler response, overriding anything the handler wrote.
///
/// | Header                           | Value                      |
/// |----------------------------------|----------------------------|
/// | `Access-Control-Allow-Origin`    | `*`                        |
/// | `Access-Control-Allow-Headers`   | `*`                        |
/// | `Access-Control-Max-Age`         | `1000`                     |
/// | `Content-Type`                   | `application/json`         |
/// | `Access-Control-Allow-Methods`   | `POST, GET, OPTIONS, HEAD` |
pub fn default_headers() -> [(HeaderName, HeaderValue); 5] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("*"),
        ),
        (
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(CORS_MAX_AGE),
        ),
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ),
    ]
}

/// Wraps every route currently in `router` with [`default_headers`].
///
/// Routes added afterwards (static content) are left untouched.
pub fn apply(router: Router) -> Router {
    default_headers()
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(name, value))
        })
}
