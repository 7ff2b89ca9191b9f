//! Schema-validated handler adding two non-negative integers.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::api::SchemaHandler;
use crate::api::dto::{Envelope, ErrorRecord, ErrorsBody, Reply};
use crate::error::HandlerError;

pub const ROUTE: &str = "/sum.json";

/// Largest sum the handler accepts.
pub const MAX_SUM: i64 = 500;

/// Digit sequence rejected in either operand.
const FORBIDDEN_DIGITS: &str = "666";

/// Request body.
///
/// ```json
/// { "foo": 3, "bar": 4 }
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SumRequest {
    #[validate(range(min = 0))]
    pub foo: i64,

    #[validate(range(min = 0))]
    pub bar: i64,
}

/// Response body. `errors` is never sent on success.
///
/// ```json
/// { "summ": 7 }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SumResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summ: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorRecord>>,
}

impl Envelope for SumResponse {
    fn errors(&self) -> &[ErrorRecord] {
        self.errors.as_deref().unwrap_or_default()
    }

    fn clear_errors(&mut self) {
        self.errors = None;
    }
}

/// Adds `foo` and `bar`.
///
/// # Endpoint
///
/// `POST /sum.json`
///
/// # Rules
///
/// - both operands are non-negative integers (schema)
/// - neither operand contains the digits `666` (request check)
/// - the sum must not exceed [`MAX_SUM`] (processing)
///
/// # Errors
///
/// Every failure is answered with `400` and
/// `{"errors": [{"id": null, "description": "<Kind>: <message>"}]}`.
pub struct SumHandler;

impl SchemaHandler for SumHandler {
    type Request = SumRequest;
    type Response = SumResponse;

    fn check_request(&self, request: &SumRequest) -> Result<(), HandlerError> {
        let forbidden = [request.foo, request.bar]
            .iter()
            .any(|value| value.to_string().contains(FORBIDDEN_DIGITS));

        if forbidden {
            return Err(HandlerError::value(format!(
                "Values of foo and bar should not contain {FORBIDDEN_DIGITS}"
            )));
        }
        Ok(())
    }

    fn process(&self, request: SumRequest) -> Result<SumResponse, HandlerError> {
        let summ = request
            .foo
            .checked_add(request.bar)
            .filter(|summ| *summ <= MAX_SUM)
            .ok_or_else(|| {
                HandlerError::value(format!("The sum of foo and bar is more than {MAX_SUM}"))
            })?;

        Ok(SumResponse {
            summ: Some(summ),
            errors: Some(Vec::new()),
        })
    }

    fn on_exception(&self, errors: Vec<ErrorRecord>, reply: &mut Reply) {
        reply.set_status(StatusCode::BAD_REQUEST);
        reply.write(json!(ErrorsBody::new(errors)));
    }
}
