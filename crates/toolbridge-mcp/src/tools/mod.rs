//! Method handlers built on the capability provider.

pub mod list;

pub use list::{ToolsListHandler, TOOLS_LIST_METHOD};
