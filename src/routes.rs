//! Top-level router combining handler routes and static content.
//!
//! # Route Structure
//!
//! - one route per [`HandlerDescriptor`], all verbs, uniform JSON headers
//! - `GET /favicon.ico`  - `<static_dir>/favicon.ico`
//! - `<static_url>*`     - files under `<static_dir>`, `index.html` for directories
//!
//! # Middleware
//!
//! - **Headers** - CORS and content-type headers on handler routes only
//! - **Tracing** - Structured request/response logging on every route

use std::collections::HashSet;
use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::api::handler::method_router;
use crate::api::middleware::{headers, tracing};
use crate::error::DiscoveryError;
use crate::registry::{HandlerDescriptor, check_route};

/// Path of the dedicated favicon route.
pub const FAVICON_ROUTE: &str = "/favicon.ico";

/// Constructs the application router.
///
/// # Arguments
///
/// - `descriptors` - discovered handlers
/// - `static_url` - URL prefix of static content, starting with `/`
/// - `static_dir` - directory holding static content and `favicon.ico`
///
/// # Errors
///
/// - [`DiscoveryError::InvalidRoute`] if a handler route is not a valid path
///   pattern or the static prefix is not a literal path
/// - [`DiscoveryError::DuplicateRoute`] if two handlers claim the same route
///   (captures compared by position, not name), a handler claims the favicon
///   route, or a handler route lies under the static prefix
pub fn app_router(
    descriptors: &[HandlerDescriptor],
    static_url: &str,
    static_dir: &Path,
) -> Result<Router, DiscoveryError> {
    let prefix = static_url.trim().trim_end_matches('/');
    check_static_prefix(prefix)?;

    let mut seen = HashSet::from([FAVICON_ROUTE.to_string()]);
    let mut handlers = Router::new();

    for descriptor in descriptors {
        check_route(&descriptor.name, &descriptor.route)?;

        let taken = !seen.insert(route_shape(&descriptor.route))
            || under_prefix(&descriptor.route, prefix);
        if taken {
            return Err(DiscoveryError::DuplicateRoute {
                name: descriptor.name.clone(),
                route: descriptor.route.clone(),
            });
        }
        handlers = handlers.route(
            &descriptor.route,
            method_router(descriptor.handler.clone()),
        );
    }

    let router = headers::apply(handlers)
        .route_service(FAVICON_ROUTE, ServeFile::new(static_dir.join("favicon.ico")));

    let static_files = ServeDir::new(static_dir).append_index_html_on_directories(true);

    let router = if prefix.is_empty() {
        router.fallback_service(static_files)
    } else {
        router.nest_service(prefix, static_files)
    };

    Ok(router.layer(tracing::layer()))
}

/// Route with capture names erased, so `/{a}` and `/{b}` compare equal.
fn route_shape(route: &str) -> String {
    route
        .split('/')
        .map(|segment| match segment.strip_prefix('{') {
            Some(capture) if capture.starts_with('*') => "{*}",
            Some(_) => "{}",
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// `true` when the static mount at `prefix` already owns `route`.
fn under_prefix(route: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && route
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn check_static_prefix(prefix: &str) -> Result<(), DiscoveryError> {
    let literal = prefix.is_empty()
        || (prefix.starts_with('/')
            && !prefix.contains(['{', '}'])
            && !prefix.split('/').any(|s| s.starts_with(':') || s.starts_with('*')));

    if literal {
        Ok(())
    } else {
        Err(DiscoveryError::InvalidRoute {
            name: "static".to_string(),
            route: prefix.to_string(),
            reason: "static prefix must be a literal path",
        })
    }
}
