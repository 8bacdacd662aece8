//! Integration tests for restgate.
//!
//! These tests drive the full pipeline in-process through
//! [`RestHttpService::handle`] with buffered request bodies; no listener
//! is started.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use serde_json::{Value, json};

use restgate_core::{
    CallFuture, Invocation, OperationDescriptor, RestgateConfig, Service, ServiceCallError,
    ServiceRegistry,
};
use restgate_http::{App, AuthCallback, Controller, ResponseBody, RestHttpService};

/// Number of times any [`ProbeService`] operation has run.
pub static PROBE_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Number of times any [`SentryService`] operation has run. Kept separate
/// from [`PROBE_CALLS`] so the deny-all test can assert "dispatch never
/// reached" without racing tests that exercise the probe route.
pub static SENTRY_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Widgets test service: `list` on `GET /widgets`, `create` on
/// `POST /widgets`.
#[derive(Debug, Default)]
pub struct WidgetsService;

impl Service for WidgetsService {
    fn name(&self) -> &'static str {
        "Widgets"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new("list", http::Method::GET, "/widgets"),
            OperationDescriptor::new("create", http::Method::POST, "/widgets"),
        ]
    }

    fn call(&self, operation: &str, invocation: Invocation) -> CallFuture {
        match operation {
            "list" => Box::pin(async { Ok(json!([{"id": 1, "name": "bolt"}])) }),
            "create" => Box::pin(async move {
                Ok(json!({
                    "payload": invocation.payload,
                    "raw_len": invocation.body.len(),
                }))
            }),
            other => {
                let op = other.to_owned();
                Box::pin(async move { Err(ServiceCallError::UnknownOperation(op)) })
            }
        }
    }
}

/// A service exposing no operations at all.
#[derive(Debug, Default)]
pub struct BareService;

impl Service for BareService {
    fn name(&self) -> &'static str {
        "Bare"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        Vec::new()
    }

    fn call(&self, operation: &str, _invocation: Invocation) -> CallFuture {
        let op = operation.to_owned();
        Box::pin(async move { Err(ServiceCallError::UnknownOperation(op)) })
    }
}

/// A service whose only route collides with the Widgets list route.
#[derive(Debug, Default)]
pub struct ClashService;

impl Service for ClashService {
    fn name(&self) -> &'static str {
        "Clash"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![OperationDescriptor::new(
            "list",
            http::Method::GET,
            "/widgets",
        )]
    }

    fn call(&self, operation: &str, _invocation: Invocation) -> CallFuture {
        let op = operation.to_owned();
        Box::pin(async move { Err(ServiceCallError::UnknownOperation(op)) })
    }
}

/// A service counting how often dispatch actually reaches it.
#[derive(Debug, Default)]
pub struct ProbeService;

impl Service for ProbeService {
    fn name(&self) -> &'static str {
        "Probe"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![OperationDescriptor::new(
            "ping",
            http::Method::GET,
            "/probe",
        )]
    }

    fn call(&self, operation: &str, _invocation: Invocation) -> CallFuture {
        match operation {
            "ping" => {
                PROBE_CALLS.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { Ok(json!({"pong": true})) })
            }
            other => {
                let op = other.to_owned();
                Box::pin(async move { Err(ServiceCallError::UnknownOperation(op)) })
            }
        }
    }
}

/// A second counting service, guarding its own route and counter.
#[derive(Debug, Default)]
pub struct SentryService;

impl Service for SentryService {
    fn name(&self) -> &'static str {
        "Sentry"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![OperationDescriptor::new(
            "check",
            http::Method::GET,
            "/sentry",
        )]
    }

    fn call(&self, operation: &str, _invocation: Invocation) -> CallFuture {
        match operation {
            "check" => {
                SENTRY_CALLS.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { Ok(json!({"ok": true})) })
            }
            other => {
                let op = other.to_owned();
                Box::pin(async move { Err(ServiceCallError::UnknownOperation(op)) })
            }
        }
    }
}

/// Registry holding every test service under its bare name and under the
/// `api` namespace.
#[must_use]
pub fn test_registry() -> ServiceRegistry {
    fn widgets() -> Arc<dyn Service> {
        Arc::new(WidgetsService)
    }
    fn bare() -> Arc<dyn Service> {
        Arc::new(BareService)
    }
    fn clash() -> Arc<dyn Service> {
        Arc::new(ClashService)
    }
    fn probe() -> Arc<dyn Service> {
        Arc::new(ProbeService)
    }
    fn sentry() -> Arc<dyn Service> {
        Arc::new(SentryService)
    }

    let mut registry = ServiceRegistry::new();
    for (name, ctor) in [
        ("Widgets", widgets as restgate_core::ServiceCtor),
        ("Bare", bare),
        ("Clash", clash),
        ("Probe", probe),
        ("Sentry", sentry),
    ] {
        registry.register(name, ctor);
        registry.register(format!("api.{name}"), ctor);
    }
    registry
}

/// Create a temporary services directory holding one manifest per name.
#[must_use]
pub fn services_dir(names: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in names {
        std::fs::write(dir.path().join(format!("{name}.svc")), "").expect("write manifest");
    }
    dir
}

/// Wire a controller end to end over the given manifest directory and hand
/// back the served pipeline.
#[must_use]
pub fn build_service(dir: &Path, auth: Option<AuthCallback>) -> RestHttpService {
    let config = RestgateConfig {
        services_dir: dir.display().to_string(),
        ..RestgateConfig::default()
    };

    let mut controller = Controller::new();
    controller
        .set_app(Some(App::new(config)))
        .expect("bind app");

    let discovered = controller
        .all_services(&test_registry())
        .expect("discovery");
    controller
        .add_auto_routing(&discovered)
        .expect("auto routing");

    if let Some(callback) = auth {
        controller
            .set_auth_callback(Some(callback))
            .expect("valid callback");
    }

    RestHttpService::new(controller.into_app().expect("wired app"))
}

/// Build a buffered-body request.
#[must_use]
pub fn request(
    method: http::Method,
    uri: &str,
    body: &[u8],
    content_type: Option<&str>,
) -> http::Request<Full<Bytes>> {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    builder
        .body(Full::new(Bytes::copy_from_slice(body)))
        .expect("valid request")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: http::Response<ResponseBody>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}

mod test_auth;
mod test_discovery;
mod test_pipeline;
mod test_routing;
