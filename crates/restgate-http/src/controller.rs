//! The orchestrator wiring discovery, auto-routing, and authorization
//! against a host application.
//!
//! A `Controller` is an explicit, caller-constructed value — there is no
//! singleton accessor and no process-wide state. One controller wires one
//! application; multi-tenant embeddings construct one per tenant.

use std::path::Path;
use std::sync::Arc;

use restgate_core::{
    RestgateError, RestgateResult, ServiceDefinition, ServiceRegistry, discover_services,
};
use tracing::info;

use crate::app::App;
use crate::auth::AuthCallback;
use crate::autoroute;
use crate::pipeline::DeserializerStage;

/// Orchestrates a host application's setup: binding, service discovery,
/// route registration, and the authorization callback surface.
#[derive(Debug, Default)]
pub struct Controller {
    app: Option<App>,
}

impl Controller {
    /// Create a controller with no application bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the host application and run initialization.
    ///
    /// Initialization registers the body-deserializer stage with the
    /// application's middleware chain. This happens once per `set_app`
    /// call: binding again appends another stage instance (the chain is
    /// not deduplicated).
    ///
    /// # Errors
    ///
    /// Returns [`RestgateError::Configuration`] when `app` is `None`; the
    /// controller does not construct applications and cannot repair an
    /// empty binding. No middleware is registered in that case.
    pub fn set_app(&mut self, app: Option<App>) -> RestgateResult<()> {
        let Some(mut app) = app else {
            return Err(RestgateError::Configuration(
                "controller cannot be initialized with an empty application".to_owned(),
            ));
        };

        let stage = DeserializerStage::new(Arc::clone(app.codecs()));
        app.add(Arc::new(stage));
        info!("registered request body deserializer middleware");

        self.app = Some(app);
        Ok(())
    }

    /// The bound application, or `None` when unset. No side effects.
    #[must_use]
    pub fn app(&self) -> Option<&App> {
        self.app.as_ref()
    }

    /// Mutable access to the bound application.
    pub fn app_mut(&mut self) -> Option<&mut App> {
        self.app.as_mut()
    }

    /// Discover every service named by a manifest under the configured
    /// services directory, instantiated from `registry`.
    ///
    /// Exposed so callers can inspect or customize the set before
    /// [`add_auto_routing`](Controller::add_auto_routing).
    pub fn all_services(
        &self,
        registry: &ServiceRegistry,
    ) -> RestgateResult<Vec<ServiceDefinition>> {
        let app = self.bound()?;
        let config = app.config();
        discover_services(
            Path::new(&config.services_dir),
            config.services_ns.as_deref(),
            registry,
        )
    }

    /// Derive and install route entries for the given definitions.
    ///
    /// Returns the number of routes installed.
    pub fn add_auto_routing(&mut self, services: &[ServiceDefinition]) -> RestgateResult<usize> {
        let app = self
            .app
            .as_mut()
            .ok_or_else(Self::no_app)?;
        autoroute::register_routes(app, services)
    }

    /// Configure the authorization callback on the bound application.
    ///
    /// Delegates to [`crate::AuthPolicy::set_callback`]: a `None`
    /// (non-invocable) value clears any previously active callback before
    /// the call fails.
    pub fn set_auth_callback(&self, callback: Option<AuthCallback>) -> RestgateResult<()> {
        self.bound()?.auth().set_callback(callback)
    }

    /// The active authorization callback, or `None` when unset or when no
    /// application is bound.
    #[must_use]
    pub fn auth_callback(&self) -> Option<AuthCallback> {
        self.app.as_ref().and_then(|app| app.auth().callback())
    }

    /// Consume the controller, handing the fully wired application to the
    /// HTTP service. The route table is immutable from here on; it must be
    /// complete before the listener starts accepting connections.
    pub fn into_app(self) -> RestgateResult<App> {
        self.app.ok_or_else(Self::no_app)
    }

    fn bound(&self) -> RestgateResult<&App> {
        self.app.as_ref().ok_or_else(Self::no_app)
    }

    fn no_app() -> RestgateError {
        RestgateError::Configuration(
            "no application bound; call set_app with a valid application first".to_owned(),
        )
    }
}
