//! Method: tools/list — enumerate tools from the capability provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use toolbridge::CapabilityProvider;

use crate::protocol::MethodHandler;
use crate::types::{McpError, McpResult};

pub const TOOLS_LIST_METHOD: &str = "tools/list";

/// Returns the provider's descriptors as the result array, untouched.
///
/// `params` is ignored.
pub struct ToolsListHandler {
    provider: Arc<dyn CapabilityProvider>,
}

impl ToolsListHandler {
    pub fn new(provider: Arc<dyn CapabilityProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl MethodHandler for ToolsListHandler {
    async fn call(&self, _params: Option<Value>, cancel: &CancellationToken) -> McpResult<Value> {
        let tools = self.provider.list_tools(cancel).await?;
        tracing::debug!("{TOOLS_LIST_METHOD} returning {} tool(s)", tools.len());
        serde_json::to_value(tools).map_err(|e| McpError::InternalError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbridge::{MockToolProvider, ProviderError, ProviderResult, ToolDescriptor};

    struct FailingProvider;

    #[async_trait]
    impl CapabilityProvider for FailingProvider {
        async fn list_tools(&self, _cancel: &CancellationToken) -> ProviderResult<Vec<ToolDescriptor>> {
            Err(ProviderError::Unavailable("host application not running".into()))
        }
    }

    #[tokio::test]
    async fn test_result_matches_provider() {
        let handler = ToolsListHandler::new(Arc::new(MockToolProvider::new()));
        let value = handler.call(None, &CancellationToken::new()).await.unwrap();
        let expected = serde_json::to_value(vec![MockToolProvider::descriptor()]).unwrap();
        assert_eq!(value, expected);
        assert_eq!(value[0]["id"], "mock-buffer-model");
    }

    #[tokio::test]
    async fn test_provider_failure_is_internal() {
        let handler = ToolsListHandler::new(Arc::new(FailingProvider));
        let err = handler.call(None, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, McpError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_provider_cancellation_propagates() {
        let handler = ToolsListHandler::new(Arc::new(MockToolProvider::new()));
        let token = CancellationToken::new();
        token.cancel();
        let err = handler.call(None, &token).await.unwrap_err();
        assert!(matches!(err, McpError::Cancelled));
    }
}
