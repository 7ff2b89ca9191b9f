//! Base request handler.
//!
//! Every route is served by a [`RouteHandler`]. Verbs a handler does not
//! override answer with `400 Bad Request` and
//! `{"error": "Method <verb> is not supported"}`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{MethodRouter, any},
};
use serde_json::json;

use crate::api::dto::{Reply, UnsupportedMethodBody};
use crate::error::HandlerError;

/// Upper bound for request bodies read by the dispatcher.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Request as seen by a handler: head plus the fully read body.
///
/// `body` holds a `DecodeError` when the body could not be read (for example
/// past [`MAX_BODY_BYTES`]); the verb method decides how to report it.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Result<Bytes, HandlerError>,
}

impl HandlerRequest {
    pub fn new(method: Method, uri: Uri, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Ok(body.into()),
        }
    }
}

/// Polymorphic base for every route handler.
///
/// Concrete handlers override only the verbs they support:
///
/// ```rust
/// use async_trait::async_trait;
/// use handlerkit::api::{HandlerRequest, RouteHandler};
/// use handlerkit::api::dto::Reply;
/// use serde_json::json;
///
/// struct Ping;
///
/// #[async_trait]
/// impl RouteHandler for Ping {
///     async fn get(&self, _request: HandlerRequest) -> Reply {
///         Reply::ok(json!({ "pong": true }))
///     }
/// }
/// ```
#[async_trait]
pub trait RouteHandler: Send + Sync + 'static {
    async fn get(&self, request: HandlerRequest) -> Reply {
        unsupported(&request.method)
    }

    async fn post(&self, request: HandlerRequest) -> Reply {
        unsupported(&request.method)
    }

    async fn head(&self, request: HandlerRequest) -> Reply {
        unsupported(&request.method)
    }

    async fn options(&self, request: HandlerRequest) -> Reply {
        unsupported(&request.method)
    }
}

/// `400 Bad Request` reply for a verb the handler does not implement.
pub fn unsupported(method: &Method) -> Reply {
    Reply::with_status(
        StatusCode::BAD_REQUEST,
        json!(UnsupportedMethodBody::for_method(method.as_str())),
    )
}

/// Routes a request to the handler method matching its verb.
pub async fn dispatch(handler: &dyn RouteHandler, request: HandlerRequest) -> Reply {
    match &request.method {
        &Method::GET => handler.get(request).await,
        &Method::POST => handler.post(request).await,
        &Method::HEAD => handler.head(request).await,
        &Method::OPTIONS => handler.options(request).await,
        other => unsupported(other),
    }
}

/// Adapts a handler to an Axum method router accepting every verb.
pub fn method_router(handler: Arc<dyn RouteHandler>) -> MethodRouter {
    any(move |request: Request| {
        let handler = Arc::clone(&handler);
        async move { serve(handler, request).await }
    })
}

async fn serve(handler: Arc<dyn RouteHandler>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        tracing::debug!(uri = %parts.uri, "Failed to read request body: {e}");
        HandlerError::decode(e.to_string())
    });

    let request = HandlerRequest {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    };

    dispatch(handler.as_ref(), request).await.into_response()
}
