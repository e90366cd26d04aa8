//! toolbridge MCP server — line-delimited JSON-RPC access to the tool catalog.

pub mod config;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_catalog_path, RunMode, ServerConfig};
pub use protocol::{MethodHandler, MethodRegistry, ProtocolHandler};
pub use transport::StdioTransport;
