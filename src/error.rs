//! Error types shared across the crate.
//!
//! - [`HandlerError`] - failure raised inside a request pipeline, reduced to an
//!   [`ErrorRecord`](crate::api::dto::ErrorRecord) before it reaches the wire
//! - [`DiscoveryError`] - the handler directory could not be turned into descriptors
//! - [`StartupError`] - fatal bootstrap failures (no retry)

use std::borrow::Cow;
use std::path::PathBuf;

/// A failure raised by a request pipeline stage or by user code bound to it.
///
/// Carries a short kind (`ValueError`, `ValidationError`, ...) and a human-readable
/// message. Rendered as `"<kind>: <message>"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct HandlerError {
    kind: Cow<'static, str>,
    message: String,
}

impl HandlerError {
    pub fn new(kind: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// A rejected value (business rule or processing failure).
    pub fn value(message: impl Into<String>) -> Self {
        Self::new("ValueError", message)
    }

    /// Request body does not satisfy the declared schema.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("ValidationError", message)
    }

    /// Request body is not valid JSON.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new("DecodeError", message)
    }

    /// The offloaded processing task did not complete.
    pub fn task(message: impl Into<String>) -> Self {
        Self::new("TaskError", message)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<validator::ValidationErrors> for HandlerError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation(errors.to_string())
    }
}

/// Errors produced while turning a handler directory into descriptors.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Handler directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Handler path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to read handler directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid handler manifest {}: {source}", path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid route '{route}' for handler '{name}': {reason}")]
    InvalidRoute {
        name: String,
        route: String,
        reason: &'static str,
    },

    #[error("Route '{route}' of handler '{name}' is already taken")]
    DuplicateRoute { name: String, route: String },
}

/// Fatal errors that abort server startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Protocol '{0}' is not supported")]
    UnsupportedProtocol(String),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("Failed to load TLS certificate or key: {0}")]
    Tls(#[source] std::io::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
