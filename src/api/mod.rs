//! Request handling layer wrapped around Axum.
//!
//! # Modules
//!
//! - [`dto`] - Wire types: error records, response envelopes, replies
//! - [`handler`] - Base request handler with default responses for every verb
//! - [`schema`] - Schema-validated handler pipeline
//! - [`middleware`] - Uniform response headers and request tracing

pub mod dto;
pub mod handler;
pub mod middleware;
pub mod schema;

pub use handler::{HandlerRequest, RouteHandler};
pub use schema::{SchemaHandler, Validated};
