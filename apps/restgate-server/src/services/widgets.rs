//! The Widgets demo service: an in-memory CRUD surface.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use http::Method;
use restgate_core::{
    CallFuture, Invocation, OperationDescriptor, PayloadShape, Service, ServiceCallError,
};
use serde_json::{Value, json};

/// One widget record.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Widget {
    /// Assigned identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// In-memory widget store exposed as a service.
#[derive(Debug, Default)]
pub struct WidgetsService {
    store: DashMap<u64, Widget>,
    next_id: AtomicU64,
}

/// Registry constructor.
#[must_use]
pub fn new_service() -> Arc<dyn Service> {
    Arc::new(WidgetsService::default())
}

impl WidgetsService {
    fn list(&self) -> Value {
        let mut widgets: Vec<Widget> = self.store.iter().map(|e| e.value().clone()).collect();
        widgets.sort_by_key(|w| w.id);
        json!(widgets)
    }

    fn get(&self, invocation: &Invocation) -> Result<Value, ServiceCallError> {
        let id = parse_id(invocation)?;
        let widget = self
            .store
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or_else(|| anyhow::anyhow!("widget {id} does not exist"))?;
        Ok(json!(widget))
    }

    fn create(&self, invocation: &Invocation) -> Result<Value, ServiceCallError> {
        let name = invocation
            .payload
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("request body must carry a `name` field"))?
            .to_owned();

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let widget = Widget { id, name };
        self.store.insert(id, widget.clone());
        Ok(json!(widget))
    }

    fn delete(&self, invocation: &Invocation) -> Result<Value, ServiceCallError> {
        let id = parse_id(invocation)?;
        let deleted = self.store.remove(&id).is_some();
        Ok(json!({ "deleted": deleted }))
    }
}

fn parse_id(invocation: &Invocation) -> Result<u64, ServiceCallError> {
    let raw = invocation
        .path_param("id")
        .ok_or_else(|| anyhow::anyhow!("missing `id` path parameter"))?;
    let id = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("`{raw}` is not a valid widget id"))?;
    Ok(id)
}

impl Service for WidgetsService {
    fn name(&self) -> &'static str {
        "Widgets"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new("list", Method::GET, "/widgets")
                .with_output(PayloadShape::Json),
            OperationDescriptor::new("get", Method::GET, "/widgets/{id}")
                .with_output(PayloadShape::Json),
            OperationDescriptor::new("create", Method::POST, "/widgets")
                .with_input(PayloadShape::Json)
                .with_output(PayloadShape::Json),
            OperationDescriptor::new("delete", Method::DELETE, "/widgets/{id}")
                .with_output(PayloadShape::Json),
        ]
    }

    fn call(&self, operation: &str, invocation: Invocation) -> CallFuture {
        let result = match operation {
            "list" => Ok(self.list()),
            "get" => self.get(&invocation),
            "create" => self.create(&invocation),
            "delete" => self.delete(&invocation),
            other => Err(ServiceCallError::UnknownOperation(other.to_owned())),
        };
        Box::pin(async move { result })
    }
}
