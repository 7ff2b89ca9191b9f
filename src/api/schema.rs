//! Schema-validated request dispatch.
//!
//! A [`SchemaHandler`] declares an input envelope (serde + `validator` rules)
//! and an output envelope, and binds three extension points. Wrapping it in
//! [`Validated`] yields a [`RouteHandler`] whose `POST` runs the pipeline:
//!
//! 1. Parse the body as JSON
//! 2. Decode it into the input envelope and apply its validation rules
//! 3. Run [`SchemaHandler::check_request`]
//! 4. Run [`SchemaHandler::process`] on the blocking pool
//! 5. Encode the output envelope (`200`) or its error list (`400`)
//!
//! Any failure in steps 1-4, or a body that could not be read at all, becomes
//! a single [`ErrorRecord`] handed to [`SchemaHandler::on_exception`], which
//! alone decides the final reply.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use validator::Validate;

use crate::api::dto::{Envelope, ErrorRecord, ErrorsBody, Reply};
use crate::api::handler::{HandlerRequest, RouteHandler};
use crate::error::HandlerError;

/// Extension points of a schema-validated route.
pub trait SchemaHandler: Send + Sync + 'static {
    /// Input envelope. Field presence and types come from serde, value
    /// constraints from `#[validate(...)]`.
    type Request: DeserializeOwned + Validate + Send + 'static;

    /// Output envelope. Absent fields should be skipped when serializing.
    type Response: Serialize + Envelope + Send + 'static;

    /// Business rules beyond the shape of the request.
    fn check_request(&self, request: &Self::Request) -> Result<(), HandlerError>;

    /// Produces the response. Runs off the async executor, so it may block.
    fn process(&self, request: Self::Request) -> Result<Self::Response, HandlerError>;

    /// Presents a pipeline failure. `errors` always holds exactly one record.
    ///
    /// Nothing is written on the hook's behalf: a hook that leaves `reply`
    /// untouched produces an empty `200 OK`.
    fn on_exception(&self, errors: Vec<ErrorRecord>, reply: &mut Reply);
}

/// [`RouteHandler`] running the schema pipeline on `POST`.
///
/// Other verbs keep the default `400` behavior.
pub struct Validated<H> {
    inner: Arc<H>,
}

impl<H: SchemaHandler> Validated<H> {
    pub fn new(handler: H) -> Self {
        Self {
            inner: Arc::new(handler),
        }
    }

    pub fn handler(&self) -> &H {
        &self.inner
    }

    /// Runs the full pipeline on a raw request body.
    pub async fn run(&self, body: &[u8]) -> Reply {
        match self.pipeline(body).await {
            Ok(reply) => reply,
            Err(err) => self.reject(&err),
        }
    }

    /// Hands a single failure to the exception hook.
    fn reject(&self, err: &HandlerError) -> Reply {
        tracing::warn!("Request rejected: {err}");
        let mut reply = Reply::new();
        self.inner.on_exception(vec![ErrorRecord::from(err)], &mut reply);
        reply
    }

    async fn pipeline(&self, body: &[u8]) -> Result<Reply, HandlerError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| HandlerError::decode(e.to_string()))?;

        let request: H::Request =
            serde_json::from_value(value).map_err(|e| HandlerError::validation(e.to_string()))?;
        request.validate()?;

        self.inner.check_request(&request)?;

        let handler = Arc::clone(&self.inner);
        let response = tokio::task::spawn_blocking(move || handler.process(request))
            .await
            .map_err(|e| HandlerError::task(e.to_string()))??;

        encode(response)
    }
}

/// Encodes a processed envelope.
///
/// Without errors the error field is cleared and the envelope is sent as-is;
/// otherwise only the error list is sent.
fn encode<R: Serialize + Envelope>(mut response: R) -> Result<Reply, HandlerError> {
    if response.errors().is_empty() {
        response.clear_errors();
        let body = serde_json::to_value(&response)
            .map_err(|e| HandlerError::new("EncodeError", e.to_string()))?;
        Ok(Reply::ok(body))
    } else {
        let body = ErrorsBody::new(response.errors().to_vec());
        Ok(Reply::with_status(StatusCode::BAD_REQUEST, json!(body)))
    }
}

#[async_trait]
impl<H: SchemaHandler> RouteHandler for Validated<H> {
    async fn post(&self, request: HandlerRequest) -> Reply {
        match &request.body {
            Ok(body) => self.run(body).await,
            Err(err) => self.reject(err),
        }
    }
}
