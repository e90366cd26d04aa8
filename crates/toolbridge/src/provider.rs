//! Capability provider abstraction and the built-in stand-in provider.
//!
//! The engine only ever asks a provider for the list of available tools.
//! Providers may be slow or fail; they receive a cancellation token and
//! should return [`ProviderError::Cancelled`] once it fires.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::types::{
    ParameterValidation, ProviderError, ProviderResult, ToolDescriptor, ToolParameter,
    DESCRIPTOR_SCHEMA_VERSION,
};

/// Source of tool descriptors.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// List the available tools, in catalog order.
    async fn list_tools(&self, cancel: &CancellationToken) -> ProviderResult<Vec<ToolDescriptor>>;
}

#[async_trait]
impl<P: CapabilityProvider + ?Sized> CapabilityProvider for Arc<P> {
    async fn list_tools(&self, cancel: &CancellationToken) -> ProviderResult<Vec<ToolDescriptor>> {
        (**self).list_tools(cancel).await
    }
}

/// Identifier of the single descriptor returned by [`MockToolProvider`].
pub const MOCK_TOOL_ID: &str = "mock-buffer-model";

/// 2024-01-01T00:00:00Z
const MOCK_LAST_MODIFIED_SECS: i64 = 1_704_067_200;

/// Stand-in provider returning one fixed buffer-model descriptor.
#[derive(Debug, Clone, Default)]
pub struct MockToolProvider;

impl MockToolProvider {
    pub fn new() -> Self {
        Self
    }

    /// The fixed descriptor this provider serves.
    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor {
            schema_version: DESCRIPTOR_SCHEMA_VERSION.to_string(),
            id: MOCK_TOOL_ID.to_string(),
            display_name: "Buffer Features".to_string(),
            source_path: "Toolboxes/Mock.atbx/BufferModel".to_string(),
            category: "Proximity".to_string(),
            description: "Creates buffer polygons around input features at a given distance."
                .to_string(),
            last_modified: DateTime::<Utc>::from_timestamp(MOCK_LAST_MODIFIED_SECS, 0)
                .unwrap_or_default(),
            dependencies: vec!["analysis".to_string()],
            inputs: vec![
                ToolParameter {
                    name: "input_features".to_string(),
                    display_name: "Input Features".to_string(),
                    data_type: "featureLayer".to_string(),
                    required: true,
                    default_value: None,
                    validation: None,
                },
                ToolParameter {
                    name: "buffer_distance".to_string(),
                    display_name: "Buffer Distance".to_string(),
                    data_type: "double".to_string(),
                    required: true,
                    default_value: Some(json!(100.0)),
                    validation: Some(ParameterValidation {
                        min: Some(0.0),
                        max: Some(10_000.0),
                        ..Default::default()
                    }),
                },
                ToolParameter {
                    name: "distance_unit".to_string(),
                    display_name: "Distance Unit".to_string(),
                    data_type: "string".to_string(),
                    required: false,
                    default_value: Some(json!("Meters")),
                    validation: Some(ParameterValidation {
                        allowed_values: Some(vec![
                            "Meters".to_string(),
                            "Kilometers".to_string(),
                            "Feet".to_string(),
                            "Miles".to_string(),
                        ]),
                        ..Default::default()
                    }),
                },
            ],
            outputs: vec![ToolParameter {
                name: "output_features".to_string(),
                display_name: "Output Features".to_string(),
                data_type: "featureClass".to_string(),
                required: true,
                default_value: None,
                validation: Some(ParameterValidation {
                    min_length: Some(1),
                    max_length: Some(160),
                    rule: Some("Must be a writable feature class path.".to_string()),
                    ..Default::default()
                }),
            }],
        }
    }
}

#[async_trait]
impl CapabilityProvider for MockToolProvider {
    async fn list_tools(&self, cancel: &CancellationToken) -> ProviderResult<Vec<ToolDescriptor>> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        tracing::debug!("Serving stand-in tool catalog");
        Ok(vec![Self::descriptor()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_single_descriptor() {
        let tools = MockToolProvider::new()
            .list_tools(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].id, MOCK_TOOL_ID);
        assert_eq!(tools[0].inputs.len(), 3);
        assert_eq!(tools[0].outputs.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_is_stable() {
        let provider = MockToolProvider::new();
        let token = CancellationToken::new();
        let a = provider.list_tools(&token).await.unwrap();
        let b = provider.list_tools(&token).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_mock_observes_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let result = MockToolProvider::new().list_tools(&token).await;
        assert!(matches!(result, Err(ProviderError::Cancelled)));
    }

    #[test]
    fn test_mock_descriptor_is_valid() {
        assert!(MockToolProvider::descriptor().validate().is_ok());
    }

    #[tokio::test]
    async fn test_arc_provider_delegates() {
        let provider: Arc<dyn CapabilityProvider> = Arc::new(MockToolProvider::new());
        let tools = provider.list_tools(&CancellationToken::new()).await.unwrap();
        assert_eq!(tools[0].id, MOCK_TOOL_ID);
    }
}
