//! The host application object.
//!
//! An [`App`] owns everything a running restgate deployment needs: the
//! configuration, the middleware chain, the route table, the codec set,
//! and the authorization policy. It is constructed by the caller, wired by
//! a [`Controller`](crate::Controller), and then consumed by
//! [`RestHttpService`](crate::RestHttpService) — after which the route
//! table is immutable for the lifetime of the process.

use std::sync::Arc;

use restgate_core::RestgateConfig;

use crate::auth::AuthPolicy;
use crate::codec::CodecSet;
use crate::pipeline::PipelineStage;
use crate::router::RouteTable;

/// A restgate host application.
pub struct App {
    config: RestgateConfig,
    middleware: Vec<Arc<dyn PipelineStage>>,
    routes: RouteTable,
    codecs: Arc<CodecSet>,
    auth: Arc<AuthPolicy>,
}

impl App {
    /// Create an application with the default codec set and an unset
    /// authorization policy.
    #[must_use]
    pub fn new(config: RestgateConfig) -> Self {
        Self::with_codecs(config, CodecSet::default())
    }

    /// Create an application with a caller-supplied codec set.
    #[must_use]
    pub fn with_codecs(config: RestgateConfig, codecs: CodecSet) -> Self {
        Self {
            config,
            middleware: Vec::new(),
            routes: RouteTable::new(),
            codecs: Arc::new(codecs),
            auth: Arc::new(AuthPolicy::new()),
        }
    }

    /// The application configuration.
    #[must_use]
    pub fn config(&self) -> &RestgateConfig {
        &self.config
    }

    /// Register a request interceptor at the end of the chain.
    ///
    /// The chain is not deduplicated; registering a stage twice runs it
    /// twice.
    pub fn add(&mut self, stage: Arc<dyn PipelineStage>) {
        self.middleware.push(stage);
    }

    /// The middleware chain, in registration order.
    #[must_use]
    pub fn middleware(&self) -> &[Arc<dyn PipelineStage>] {
        &self.middleware
    }

    /// The route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Mutable access to the route table (startup wiring only).
    pub fn routes_mut(&mut self) -> &mut RouteTable {
        &mut self.routes
    }

    /// The codec set.
    #[must_use]
    pub fn codecs(&self) -> &Arc<CodecSet> {
        &self.codecs
    }

    /// The authorization policy.
    #[must_use]
    pub fn auth(&self) -> &Arc<AuthPolicy> {
        &self.auth
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field(
                "middleware",
                &self
                    .middleware
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>(),
            )
            .field("routes", &self.routes.len())
            .field("auth", &self.auth)
            .finish()
    }
}
