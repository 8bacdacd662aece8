//! The explicit registry of statically known service constructors.
//!
//! Discovery never resolves types by name at runtime: a manifest's
//! identifier is looked up here, and the registered constructor produces
//! the instance. The registry is populated at startup from a statically
//! known list of implementations.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::service::Service;

/// A no-argument constructor producing a shared service instance.
pub type ServiceCtor = fn() -> Arc<dyn Service>;

/// Maps fully-qualified service identifiers to their constructors.
#[derive(Default)]
pub struct ServiceRegistry {
    ctors: HashMap<String, ServiceCtor>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `name`.
    ///
    /// A later registration for the same name replaces the earlier one;
    /// registration is a build-time concern and duplicates indicate a
    /// wiring mistake caught by review, not a runtime condition.
    pub fn register(&mut self, name: impl Into<String>, ctor: ServiceCtor) {
        self.ctors.insert(name.into(), ctor);
    }

    /// Instantiate the service registered under `name`, if any.
    #[must_use]
    pub fn instantiate(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.ctors.get(name).map(|ctor| ctor())
    }

    /// Whether a constructor is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.ctors.contains_key(name)
    }

    /// Number of registered constructors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ctors.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ctors.is_empty()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.ctors.keys().collect::<Vec<_>>())
            .finish()
    }
}
