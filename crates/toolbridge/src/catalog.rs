//! File-backed tool catalog: a JSON array of descriptors on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::provider::CapabilityProvider;
use crate::types::{ProviderError, ProviderResult, ToolDescriptor};

/// Provider that reads descriptors from a JSON catalog file.
///
/// The file is re-read on every call so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct CatalogToolProvider {
    path: PathBuf,
}

impl CatalogToolProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the catalog synchronously.
    pub fn load(&self) -> ProviderResult<Vec<ToolDescriptor>> {
        let bytes = std::fs::read(&self.path)?;
        parse_catalog(&bytes)
    }
}

/// Parse catalog bytes, keeping file order and rejecting invalid descriptors.
pub fn parse_catalog(bytes: &[u8]) -> ProviderResult<Vec<ToolDescriptor>> {
    let tools: Vec<ToolDescriptor> = serde_json::from_slice(bytes)?;

    let mut ids = std::collections::HashSet::new();
    for tool in &tools {
        tool.validate()?;
        if !ids.insert(tool.id.as_str()) {
            return Err(ProviderError::Catalog(format!(
                "Duplicate tool id '{}'",
                tool.id
            )));
        }
    }

    Ok(tools)
}

#[async_trait]
impl CapabilityProvider for CatalogToolProvider {
    async fn list_tools(&self, cancel: &CancellationToken) -> ProviderResult<Vec<ToolDescriptor>> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            ProviderError::Unavailable(format!(
                "Failed to read catalog {}: {e}",
                self.path.display()
            ))
        })?;

        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let tools = parse_catalog(&bytes)?;
        tracing::debug!(
            "Loaded {} tool(s) from {}",
            tools.len(),
            self.path.display()
        );
        Ok(tools)
    }
}
