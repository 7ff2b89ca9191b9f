//! Bundled handlers.
//!
//! - [`status`] - liveness probe served by the base handler
//! - [`sum`] - schema-validated addition of two non-negative integers
//!
//! [`registry`] maps their module names to factories; a handler directory
//! containing `status_handler.json` and `sum_handler.json` mounts both.

pub mod status;
pub mod sum;

pub use status::StatusHandler;
pub use sum::{SumHandler, SumRequest, SumResponse};

use crate::api::Validated;
use crate::error::DiscoveryError;
use crate::registry::HandlerRegistry;

/// Registry of the bundled handlers.
///
/// | Module   | Route           |
/// |----------|-----------------|
/// | `status` | `/example.json` |
/// | `sum`    | `/sum.json`     |
pub fn registry() -> Result<HandlerRegistry, DiscoveryError> {
    let mut registry = HandlerRegistry::new();
    registry
        .register("status", status::ROUTE, || StatusHandler)?
        .register("sum", sum::ROUTE, || Validated::new(SumHandler))?;
    Ok(registry)
}
