//! The service capability trait and its invocation types.
//!
//! A [`Service`] is the unit of auto-routing: it declares its operations as
//! [`OperationDescriptor`]s and handles calls by operation name. The trait
//! uses boxed futures so instances can be held as `Arc<dyn Service>` for
//! dynamic dispatch from the route table.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use serde_json::Value;

use crate::operation::OperationDescriptor;

/// The arguments derivable from a request that an operation is called with.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Named parameters captured from the matched path pattern.
    pub path_params: HashMap<String, String>,
    /// Decoded query-string pairs, in request order.
    pub query_params: Vec<(String, String)>,
    /// The deserialized request body, when a codec matched the content type.
    pub payload: Option<Value>,
    /// The raw request body, always available.
    pub body: Bytes,
}

impl Invocation {
    /// Look up a path parameter by name.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Look up the first query parameter with the given name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Why a service could not complete a call.
#[derive(Debug, thiserror::Error)]
pub enum ServiceCallError {
    /// The operation identifier does not name an operation of this service.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    /// The operation ran and failed.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Boxed future returned by [`Service::call`].
pub type CallFuture = Pin<Box<dyn Future<Output = Result<Value, ServiceCallError>> + Send>>;

/// A unit exposing callable operations intended to be reachable over HTTP.
///
/// Implementations are registered in a
/// [`ServiceRegistry`](crate::ServiceRegistry) under their fully-qualified
/// name and instantiated with no arguments during discovery.
pub trait Service: Send + Sync + 'static {
    /// The service's short name, used in logs and error messages.
    fn name(&self) -> &'static str;

    /// The operations this service exposes, in declaration order.
    ///
    /// An empty vector is valid: such a service registers no routes.
    fn operations(&self) -> Vec<OperationDescriptor>;

    /// Invoke the operation named `operation` with the given arguments.
    ///
    /// Must return [`ServiceCallError::UnknownOperation`] for identifiers
    /// not present in [`operations`](Service::operations).
    fn call(&self, operation: &str, invocation: Invocation) -> CallFuture;
}
