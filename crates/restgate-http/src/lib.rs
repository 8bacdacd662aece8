//! HTTP layer for restgate: route table, request pipeline, dispatch,
//! codecs, and the hyper service.
//!
//! The request lifecycle is deserialize → authorize → invoke → serialize,
//! realized by [`RestHttpService`] over a fully wired [`App`]. Setup is
//! orchestrated by a [`Controller`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use restgate_core::{RestgateConfig, ServiceRegistry};
//! use restgate_http::{App, Controller, RestHttpService};
//!
//! # fn registry() -> ServiceRegistry { ServiceRegistry::new() }
//! # fn main() -> anyhow::Result<()> {
//! let mut controller = Controller::new();
//! controller.set_app(Some(App::new(RestgateConfig::from_env())))?;
//!
//! let services = controller.all_services(&registry())?;
//! controller.add_auto_routing(&services)?;
//! controller.set_auth_callback(Some(Arc::new(|_ctx| true)))?;
//!
//! let service = RestHttpService::new(controller.into_app()?);
//! # let _ = service;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod auth;
pub mod autoroute;
pub mod body;
pub mod codec;
pub mod context;
pub mod controller;
pub mod dispatch;
pub mod pipeline;
pub mod response;
pub mod router;
pub mod service;

pub use app::App;
pub use auth::{AuthCallback, AuthPolicy};
pub use body::ResponseBody;
pub use codec::{BodyDeserializer, BodySerializer, CodecSet, FormCodec, JsonCodec};
pub use context::{MatchedRoute, RequestContext};
pub use controller::Controller;
pub use pipeline::{AccessControlStage, DeserializerStage, PipelineStage, StageOutcome};
pub use router::{PathPattern, RouteEntry, RouteTable};
pub use service::{RestHttpService, process_request};
