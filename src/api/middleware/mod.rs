//! HTTP middleware applied around handler routes.
//!
//! Provides the uniform response headers and request tracing.

pub mod headers;
pub mod tracing;
