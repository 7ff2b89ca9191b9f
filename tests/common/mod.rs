#![allow(dead_code)]

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use handlerkit::api::dto::{ErrorRecord, Reply};
use handlerkit::api::{RouteHandler, SchemaHandler, Validated};
use handlerkit::error::HandlerError;
use handlerkit::handlers::{StatusHandler, SumHandler, SumRequest, SumResponse};
use handlerkit::registry::HandlerDescriptor;
use handlerkit::routes::app_router;
use serde_json::json;
use tempfile::TempDir;

pub const FAVICON_BYTES: &[u8] = b"\x00\x00\x01\x00fake-icon";

/// Static content directory with an index page, a favicon and a subdirectory.
pub fn create_static_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    fs::write(dir.path().join("favicon.ico"), FAVICON_BYTES).unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/index.html"), "<h1>docs</h1>").unwrap();
    dir
}

pub fn descriptor<H: RouteHandler>(name: &str, route: &str, handler: H) -> HandlerDescriptor {
    HandlerDescriptor {
        name: name.to_string(),
        route: route.to_string(),
        handler: Arc::new(handler),
    }
}

/// Test server over the given handlers, static content mounted at `/`.
pub fn create_test_server(descriptors: Vec<HandlerDescriptor>) -> (TestServer, TempDir) {
    create_test_server_with_static_url(descriptors, "/")
}

pub fn create_test_server_with_static_url(
    descriptors: Vec<HandlerDescriptor>,
    static_url: &str,
) -> (TestServer, TempDir) {
    let static_dir = create_static_dir();
    let app = app_router(&descriptors, static_url, static_dir.path()).unwrap();
    (TestServer::new(app).unwrap(), static_dir)
}

/// The bundled handlers at their registered routes.
pub fn bundled_descriptors() -> Vec<HandlerDescriptor> {
    vec![
        descriptor("status", "/example.json", StatusHandler),
        descriptor("sum", "/sum.json", Validated::new(SumHandler)),
    ]
}

/// [`SumHandler`] counting how often `process` runs.
pub struct CountingSum {
    pub calls: Arc<AtomicUsize>,
}

impl CountingSum {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl SchemaHandler for CountingSum {
    type Request = SumRequest;
    type Response = SumResponse;

    fn check_request(&self, request: &SumRequest) -> Result<(), HandlerError> {
        SumHandler.check_request(request)
    }

    fn process(&self, request: SumRequest) -> Result<SumResponse, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        SumHandler.process(request)
    }

    fn on_exception(&self, errors: Vec<ErrorRecord>, reply: &mut Reply) {
        SumHandler.on_exception(errors, reply)
    }
}

/// Exception hook that writes nothing.
pub struct SilentHook;

impl SchemaHandler for SilentHook {
    type Request = SumRequest;
    type Response = SumResponse;

    fn check_request(&self, _request: &SumRequest) -> Result<(), HandlerError> {
        Ok(())
    }

    fn process(&self, _request: SumRequest) -> Result<SumResponse, HandlerError> {
        Err(HandlerError::value("always fails"))
    }

    fn on_exception(&self, _errors: Vec<ErrorRecord>, _reply: &mut Reply) {}
}

/// Hook answering with a custom status and body shape.
pub struct TeapotHook;

impl SchemaHandler for TeapotHook {
    type Request = SumRequest;
    type Response = SumResponse;

    fn check_request(&self, _request: &SumRequest) -> Result<(), HandlerError> {
        Ok(())
    }

    fn process(&self, _request: SumRequest) -> Result<SumResponse, HandlerError> {
        Err(HandlerError::new("BrewError", "no coffee here"))
    }

    fn on_exception(&self, errors: Vec<ErrorRecord>, reply: &mut Reply) {
        reply.set_status(StatusCode::IM_A_TEAPOT);
        reply.write(json!({ "critical_error": errors[0].description }));
    }
}

/// Processing function that blocks its thread for `delay`.
pub struct SlowSum {
    pub delay: Duration,
}

impl SchemaHandler for SlowSum {
    type Request = SumRequest;
    type Response = SumResponse;

    fn check_request(&self, _request: &SumRequest) -> Result<(), HandlerError> {
        Ok(())
    }

    fn process(&self, request: SumRequest) -> Result<SumResponse, HandlerError> {
        std::thread::sleep(self.delay);
        SumHandler.process(request)
    }

    fn on_exception(&self, errors: Vec<ErrorRecord>, reply: &mut Reply) {
        SumHandler.on_exception(errors, reply)
    }
}
