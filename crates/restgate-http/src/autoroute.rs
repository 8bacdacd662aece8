//! Auto-routing: deriving route-table entries from service definitions.

use std::sync::Arc;

use restgate_core::{RestgateResult, ServiceDefinition};
use tracing::{debug, info};

use crate::app::App;

/// Install one route entry per declared operation of each definition.
///
/// A service with zero operations registers no routes and is not an error.
/// Returns the number of entries installed.
///
/// # Errors
///
/// Returns [`RouteConflict`](restgate_core::RestgateError::RouteConflict)
/// when two operations share an identical (verb, pattern) key — including
/// across different services. Registration stops at the first conflict so
/// a partial table never goes live.
pub fn register_routes(app: &mut App, services: &[ServiceDefinition]) -> RestgateResult<usize> {
    let mut installed = 0;

    for definition in services {
        if definition.operations().is_empty() {
            debug!(
                service = definition.qualified_name(),
                "service exposes no operations, nothing to register"
            );
            continue;
        }

        for op in definition.operations() {
            app.routes_mut().insert(
                op.verb().clone(),
                op.pattern(),
                Arc::clone(definition.service()),
                op.name(),
            )?;

            info!(
                service = definition.qualified_name(),
                operation = op.name(),
                verb = %op.verb(),
                pattern = op.pattern(),
                "registered route"
            );
            installed += 1;
        }
    }

    Ok(installed)
}
