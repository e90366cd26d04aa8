//! toolbridge — tool descriptor model and capability providers.

pub mod catalog;
pub mod provider;
pub mod types;

pub use catalog::{parse_catalog, CatalogToolProvider};
pub use provider::{CapabilityProvider, MockToolProvider, MOCK_TOOL_ID};
pub use types::*;
