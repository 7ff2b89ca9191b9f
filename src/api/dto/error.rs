//! DTOs for error responses.

use serde::{Deserialize, Serialize};

use crate::error::HandlerError;

/// One error reported to the client.
///
/// Built in a single step at the point of failure; `id` is serialized as
/// `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub id: Option<String>,
    pub description: String,
}

impl ErrorRecord {
    pub fn new(id: Option<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }
}

impl From<&HandlerError> for ErrorRecord {
    fn from(err: &HandlerError) -> Self {
        Self::new(None, err.to_string())
    }
}

impl From<HandlerError> for ErrorRecord {
    fn from(err: HandlerError) -> Self {
        Self::from(&err)
    }
}

/// Error envelope written by the schema pipeline and by exception hooks.
///
/// ```json
/// { "errors": [ { "id": null, "description": "ValueError: ..." } ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorsBody {
    pub errors: Vec<ErrorRecord>,
}

impl ErrorsBody {
    pub fn new(errors: Vec<ErrorRecord>) -> Self {
        Self { errors }
    }
}

/// Body returned for verbs a handler does not implement.
///
/// ```json
/// { "error": "Method delete is not supported" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsupportedMethodBody {
    pub error: String,
}

impl UnsupportedMethodBody {
    pub fn for_method(method: &str) -> Self {
        Self {
            error: format!("Method {} is not supported", method.to_ascii_lowercase()),
        }
    }
}
