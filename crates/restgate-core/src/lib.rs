//! Core service model, registry, discovery, and configuration for restgate.
//!
//! This crate provides the building blocks shared by the HTTP layer and by
//! embedding applications: the [`Service`] capability trait, the
//! [`OperationDescriptor`] metadata a service declares for each exposed
//! operation, the [`ServiceRegistry`] of statically known constructors, and
//! the manifest-directory discovery step that turns a services directory
//! into a set of [`ServiceDefinition`]s ready for auto-routing.

mod config;
mod error;
mod loader;
mod operation;
mod registry;
mod service;

pub use config::RestgateConfig;
pub use error::{RestgateError, RestgateResult};
pub use loader::{SERVICE_MANIFEST_EXT, ServiceDefinition, discover_services};
pub use operation::{OperationDescriptor, PayloadShape};
pub use registry::{ServiceCtor, ServiceRegistry};
pub use service::{CallFuture, Invocation, Service, ServiceCallError};
