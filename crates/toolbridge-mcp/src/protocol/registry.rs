//! Method registry: maps method names to async handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use toolbridge::CapabilityProvider;

use crate::tools::{ToolsListHandler, TOOLS_LIST_METHOD};
use crate::types::McpResult;

/// A handler for one JSON-RPC method.
///
/// Returning [`McpError::Cancelled`](crate::types::McpError::Cancelled)
/// suppresses the response entirely.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    async fn call(&self, params: Option<Value>, cancel: &CancellationToken) -> McpResult<Value>;
}

/// Immutable set of registered methods.
pub struct MethodRegistry {
    methods: BTreeMap<String, Arc<dyn MethodHandler>>,
}

impl MethodRegistry {
    pub fn builder() -> MethodRegistryBuilder {
        MethodRegistryBuilder::default()
    }

    /// The default registry: `tools/list` backed by `provider`.
    pub fn with_provider(provider: Arc<dyn CapabilityProvider>) -> Self {
        Self::builder()
            .register(TOOLS_LIST_METHOD, ToolsListHandler::new(provider))
            .build()
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, method: &str) -> Option<&Arc<dyn MethodHandler>> {
        self.methods.get(method)
    }

    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[derive(Default)]
pub struct MethodRegistryBuilder {
    methods: BTreeMap<String, Arc<dyn MethodHandler>>,
}

impl MethodRegistryBuilder {
    /// Register a handler. A later registration for the same name replaces
    /// the earlier one.
    pub fn register(mut self, method: impl Into<String>, handler: impl MethodHandler + 'static) -> Self {
        self.methods.insert(method.into(), Arc::new(handler));
        self
    }

    pub fn build(self) -> MethodRegistry {
        MethodRegistry {
            methods: self.methods,
        }
    }
}
