//! # handlerkit
//!
//! A thin convenience layer over Axum for small JSON APIs.
//!
//! ## Architecture
//!
//! - **Discovery** ([`registry`]) - compiled-in handler registry, mounted from a
//!   handler directory acting as a manifest
//! - **Handlers** ([`api`]) - base handler with default `400` replies and
//!   uniform headers, plus the schema-validated pipeline
//! - **Bootstrap** ([`server`], [`routes`]) - router composition with static
//!   content, plain HTTP or TLS listener
//! - **Ambient** ([`config`], [`logging`], [`error`])
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve the bundled handlers from ./demo
//! cargo run
//!
//! # Over TLS, with certificates in ./ssl
//! PROTOCOL=https SSL_CERT_FILE=cert.pem SSL_KEY_FILE=key.pem cargo run
//! ```
//!
//! ## Writing a handler
//!
//! Implement [`api::RouteHandler`] for plain verbs, or [`api::SchemaHandler`]
//! wrapped in [`api::Validated`] for validated `POST` bodies, then register it
//! in a [`registry::HandlerRegistry`]. See [`handlers`] for both flavors.

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod registry;
pub mod routes;
pub mod server;

pub use error::{DiscoveryError, HandlerError, StartupError};
pub use server::Server;

/// Commonly used types for handler authors.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::api::dto::{Envelope, ErrorRecord, Reply};
    pub use crate::api::{HandlerRequest, RouteHandler, SchemaHandler, Validated};
    pub use crate::config::Config;
    pub use crate::error::HandlerError;
    pub use crate::registry::{HandlerDescriptor, HandlerRegistry, discover};
    pub use crate::server::Server;
}
