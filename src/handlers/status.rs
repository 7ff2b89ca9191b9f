//! Handler for the status endpoint.

use async_trait::async_trait;
use serde_json::json;

use crate::api::dto::Reply;
use crate::api::{HandlerRequest, RouteHandler};

pub const ROUTE: &str = "/example.json";

/// Reports that the service is up.
///
/// # Endpoint
///
/// `GET /example.json`
///
/// # Response
///
/// ```json
/// { "status": "working" }
/// ```
///
/// Every other verb gets the default `400` reply.
pub struct StatusHandler;

#[async_trait]
impl RouteHandler for StatusHandler {
    async fn get(&self, _request: HandlerRequest) -> Reply {
        Reply::ok(json!({ "status": "working" }))
    }
}
