//! Operation dispatch: invoking the matched service operation.

use restgate_core::{Invocation, RestgateError, RestgateResult, ServiceCallError};
use serde_json::Value;
use tracing::{debug, error};

use crate::context::RequestContext;
use crate::router::RouteEntry;

/// Invoke the route entry's operation with the arguments derivable from the
/// request context.
///
/// # Errors
///
/// - [`RestgateError::OperationNotFound`] when the entry's operation
///   identifier no longer resolves on the service (a stale route table is
///   an internal consistency fault).
/// - [`RestgateError::ServiceOperation`] when the operation body fails; the
///   original cause is preserved and logged, never swallowed.
pub async fn dispatch(entry: &RouteEntry, ctx: &RequestContext) -> RestgateResult<Value> {
    let invocation = Invocation {
        path_params: ctx.path_params.clone(),
        query_params: ctx.query_params.clone(),
        payload: ctx.payload.clone(),
        body: ctx.body.clone(),
    };

    let service = entry.service();
    debug!(
        service = service.name(),
        operation = entry.operation(),
        "dispatching operation"
    );

    service
        .call(entry.operation(), invocation)
        .await
        .map_err(|e| match e {
            ServiceCallError::UnknownOperation(operation) => {
                error!(
                    service = service.name(),
                    operation = %operation,
                    "route table entry points at an unknown operation"
                );
                RestgateError::OperationNotFound {
                    service: service.name().to_owned(),
                    operation,
                }
            }
            ServiceCallError::Failed(source) => {
                error!(
                    service = service.name(),
                    operation = entry.operation(),
                    cause = %source,
                    "operation failed"
                );
                RestgateError::ServiceOperation {
                    service: service.name().to_owned(),
                    operation: entry.operation().to_owned(),
                    source,
                }
            }
        })
}
