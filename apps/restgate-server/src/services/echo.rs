//! The Echo demo service: reflects request arguments back to the caller.

use std::sync::Arc;

use http::Method;
use restgate_core::{
    CallFuture, Invocation, OperationDescriptor, PayloadShape, Service, ServiceCallError,
};
use serde_json::json;

/// Stateless echo service.
#[derive(Debug, Default)]
pub struct EchoService;

/// Registry constructor.
#[must_use]
pub fn new_service() -> Arc<dyn Service> {
    Arc::new(EchoService)
}

impl Service for EchoService {
    fn name(&self) -> &'static str {
        "Echo"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new("echo", Method::POST, "/echo")
                .with_input(PayloadShape::Json)
                .with_output(PayloadShape::Json),
            OperationDescriptor::new("say", Method::GET, "/echo/{word}")
                .with_output(PayloadShape::Json),
        ]
    }

    fn call(&self, operation: &str, invocation: Invocation) -> CallFuture {
        match operation {
            "echo" => Box::pin(async move {
                Ok(json!({
                    "payload": invocation.payload,
                    "query": invocation
                        .query_params
                        .iter()
                        .map(|(k, v)| json!([k, v]))
                        .collect::<Vec<_>>(),
                    "raw_len": invocation.body.len(),
                }))
            }),
            "say" => Box::pin(async move {
                let word = invocation.path_param("word").unwrap_or_default().to_owned();
                Ok(json!({ "word": word }))
            }),
            other => {
                let op = other.to_owned();
                Box::pin(async move { Err(ServiceCallError::UnknownOperation(op)) })
            }
        }
    }
}
