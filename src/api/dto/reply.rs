//! Response under construction for a single request.

use axum::{
    Json,
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Status and JSON body a handler (or an exception hook) writes to.
///
/// Starts as `200 OK` with no body. A reply that never receives a body is sent
/// with an empty payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    status: StatusCode,
    body: Option<Value>,
}

impl Reply {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }

    /// `200 OK` with the given body.
    pub fn ok(body: Value) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    pub fn with_status(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn write(&mut self, body: Value) {
        self.body = Some(body);
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl Default for Reply {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => (self.status, Body::empty()).into_response(),
        }
    }
}
