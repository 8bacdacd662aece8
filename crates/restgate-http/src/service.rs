//! The restgate HTTP service implementing hyper's `Service` trait.
//!
//! [`RestHttpService`] ties together the middleware chain, route
//! resolution, access control, dispatch, and response serialization. Per
//! request it:
//!
//! 1. Intercepts health-check probes (`GET /_health`, `GET /health`)
//! 2. Buffers the request body exactly once (transport streams are
//!    single-read)
//! 3. Runs the application's middleware chain (body deserialization)
//! 4. Resolves the route (miss → 404)
//! 5. Evaluates the authorization policy (denial → 403, dispatch never
//!    reached)
//! 6. Dispatches to the matched service operation
//! 7. Serializes the return value and stamps common headers

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, warn};

use crate::app::App;
use crate::body::ResponseBody;
use crate::context::{MatchedRoute, RequestContext};
use crate::dispatch::dispatch;
use crate::pipeline::{AccessControlStage, PipelineStage, StageOutcome};
use crate::response::{error_to_response, rejection_response, success_response};

/// Hyper `Service` serving a fully wired [`App`].
///
/// Consuming the app here is what makes the route table immutable: once a
/// `RestHttpService` exists there is no `&mut App` anywhere.
#[derive(Debug)]
pub struct RestHttpService {
    app: Arc<App>,
    access: Arc<AccessControlStage>,
}

impl RestHttpService {
    /// Wrap a wired application. The authorization policy is handed to the
    /// access-control stage here, at construction time.
    #[must_use]
    pub fn new(app: App) -> Self {
        let app = Arc::new(app);
        let access = Arc::new(AccessControlStage::new(Arc::clone(app.auth())));
        Self { app, access }
    }

    /// The served application.
    #[must_use]
    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    /// Process one request end to end, stamping a fresh request id and the
    /// common headers.
    ///
    /// This is the same path the hyper `Service` impl takes; it is exposed
    /// so embedders and tests can drive the pipeline with buffered bodies.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<ResponseBody>
    where
        B: http_body::Body,
        B::Error: std::fmt::Display,
    {
        let request_id = uuid::Uuid::new_v4().to_string();
        let response = process_request(&self.app, &self.access, req, &request_id).await;
        add_common_headers(response, &request_id)
    }
}

impl Clone for RestHttpService {
    fn clone(&self) -> Self {
        Self {
            app: Arc::clone(&self.app),
            access: Arc::clone(&self.access),
        }
    }
}

impl Service<http::Request<Incoming>> for RestHttpService {
    type Response = http::Response<ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let svc = self.clone();
        Box::pin(async move { Ok(svc.handle(req).await) })
    }
}

/// Process one request through the full pipeline.
///
/// Generic over the body type so tests can drive it with buffered bodies.
pub async fn process_request<B>(
    app: &App,
    access: &AccessControlStage,
    req: http::Request<B>,
    request_id: &str,
) -> http::Response<ResponseBody>
where
    B: http_body::Body,
    B::Error: std::fmt::Display,
{
    let (parts, body) = req.into_parts();
    debug!(method = %parts.method, uri = %parts.uri, request_id, "processing request");

    // Health check interception, before any routing.
    if parts.method == http::Method::GET && is_health_check(parts.uri.path()) {
        return health_check_response();
    }

    // Buffer the body exactly once; every later stage reads the buffer.
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, request_id, "failed to read request body");
            return rejection_response(
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "failed to read request body",
                request_id,
            );
        }
    };

    let mut ctx = RequestContext::from_parts(&parts, body);

    // Framework middleware chain (body deserialization).
    for stage in app.middleware() {
        match stage.handle(&mut ctx) {
            Ok(StageOutcome::Continue) => {}
            Ok(StageOutcome::Reject { status, message }) => {
                debug!(stage = stage.name(), %status, request_id, "stage rejected request");
                return rejection_response(status, &message, request_id);
            }
            Err(err) => {
                warn!(stage = stage.name(), error = %err, request_id, "stage failed");
                return error_to_response(&err, request_id);
            }
        }
    }

    // Route resolution.
    let Some((entry, params)) = app.routes().resolve(&ctx.method, &ctx.path) else {
        warn!(method = %ctx.method, path = %ctx.path, request_id, "no route matched");
        return rejection_response(
            http::StatusCode::NOT_FOUND,
            "no route matched the request",
            request_id,
        );
    };
    ctx.path_params = params;
    ctx.route = Some(MatchedRoute {
        service: entry.service().name().to_owned(),
        operation: entry.operation().to_owned(),
        pattern: entry.pattern().as_str().to_owned(),
    });

    // Access control; a denial never reaches dispatch.
    match access.handle(&mut ctx) {
        Ok(StageOutcome::Continue) => {}
        Ok(StageOutcome::Reject { status, message }) => {
            return rejection_response(status, &message, request_id);
        }
        Err(err) => return error_to_response(&err, request_id),
    }

    // Dispatch and serialize.
    match dispatch(entry, &ctx).await {
        Ok(value) => success_response(
            &value,
            app.codecs(),
            ctx.header(http::header::ACCEPT.as_str()),
            request_id,
        ),
        Err(err) => error_to_response(&err, request_id),
    }
}

/// Check if the request path is a health-check probe.
fn is_health_check(path: &str) -> bool {
    path == "/_health" || path == "/health"
}

/// Produce a health-check response.
fn health_check_response() -> http::Response<ResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("content-type", "application/json")
        .body(ResponseBody::from_string(r#"{"status":"running"}"#))
        .expect("static health response should be valid")
}

/// Stamp common headers on every response.
fn add_common_headers(
    mut response: http::Response<ResponseBody>,
    request_id: &str,
) -> http::Response<ResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }

    headers.insert("server", http::HeaderValue::from_static("restgate"));

    response
}
