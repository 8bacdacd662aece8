//! The demo services bundled with the server.
//!
//! Constructors are registered both bare and under the `demo` namespace so
//! the server works with `SERVICES_NS` unset or set to `demo`.

pub mod echo;
pub mod widgets;

use restgate_core::ServiceRegistry;

/// Build the registry of bundled demo services.
#[must_use]
pub fn registry() -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    for name in ["Widgets", "demo.Widgets"] {
        registry.register(name, widgets::new_service);
    }
    for name in ["Echo", "demo.Echo"] {
        registry.register(name, echo::new_service);
    }
    registry
}
