//! Service discovery: scanning a manifest directory into service definitions.
//!
//! The services directory holds one manifest file per service the
//! application wants routed. Only the file *name* matters: the stem (plus
//! the configured namespace prefix) is the identifier looked up in the
//! [`ServiceRegistry`]; the manifest's content is not interpreted.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{RestgateError, RestgateResult};
use crate::operation::OperationDescriptor;
use crate::registry::ServiceRegistry;
use crate::service::Service;

/// The recognized manifest extension; entries with any other extension are
/// skipped silently.
pub const SERVICE_MANIFEST_EXT: &str = "svc";

/// A discovered, instantiated service together with its captured metadata.
#[derive(Clone)]
pub struct ServiceDefinition {
    qualified_name: String,
    service: Arc<dyn Service>,
    operations: Vec<OperationDescriptor>,
}

impl ServiceDefinition {
    /// The fully-qualified identifier this definition was loaded under.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The shared service instance.
    #[must_use]
    pub fn service(&self) -> &Arc<dyn Service> {
        &self.service
    }

    /// The operations declared by the instance at discovery time, in
    /// declaration order.
    #[must_use]
    pub fn operations(&self) -> &[OperationDescriptor] {
        &self.operations
    }
}

impl std::fmt::Debug for ServiceDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDefinition")
            .field("qualified_name", &self.qualified_name)
            .field("operations", &self.operations.len())
            .finish()
    }
}

/// Recursively scan `dir` for service manifests and instantiate each one
/// from `registry`.
///
/// Definitions are returned in traversal order. Traversal order is not
/// stable across file systems; consumers must rely on the completeness of
/// the set, never on its ordering.
///
/// # Errors
///
/// - [`RestgateError::ServicesDir`] when the directory cannot be read.
/// - [`RestgateError::ServiceLoad`] when a manifest's identifier has no
///   registered constructor. Discovery aborts at the first failure.
pub fn discover_services(
    dir: &Path,
    ns_prefix: Option<&str>,
    registry: &ServiceRegistry,
) -> RestgateResult<Vec<ServiceDefinition>> {
    let mut definitions = Vec::new();
    visit(dir, ns_prefix, registry, &mut definitions)?;

    info!(
        dir = %dir.display(),
        services = definitions.len(),
        "service discovery complete"
    );

    Ok(definitions)
}

/// Visit one directory level, recursing into subdirectories.
fn visit(
    dir: &Path,
    ns_prefix: Option<&str>,
    registry: &ServiceRegistry,
    definitions: &mut Vec<ServiceDefinition>,
) -> RestgateResult<()> {
    let entries = fs::read_dir(dir).map_err(|source| RestgateError::ServicesDir {
        path: dir.display().to_string(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| RestgateError::ServicesDir {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            visit(&path, ns_prefix, registry, definitions)?;
            continue;
        }

        let extension = path.extension().and_then(|e| e.to_str());
        if extension != Some(SERVICE_MANIFEST_EXT) {
            debug!(path = %path.display(), "skipping non-manifest entry");
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            debug!(path = %path.display(), "skipping manifest with unreadable stem");
            continue;
        };

        let qualified = qualify(ns_prefix, stem);
        let service =
            registry
                .instantiate(&qualified)
                .ok_or_else(|| RestgateError::ServiceLoad {
                    service: qualified.clone(),
                    reason: "no registered constructor for this identifier".to_owned(),
                })?;

        let operations = service.operations();
        debug!(
            service = %qualified,
            operations = operations.len(),
            manifest = %path.display(),
            "loaded service"
        );

        definitions.push(ServiceDefinition {
            qualified_name: qualified,
            service,
            operations,
        });
    }

    Ok(())
}

/// Qualify a manifest stem with the namespace prefix, when one is set.
fn qualify(ns_prefix: Option<&str>, stem: &str) -> String {
    match ns_prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}.{stem}"),
        _ => stem.to_owned(),
    }
}
