//! Protocol handling — validation, method registry and dispatch.

pub mod handler;
pub mod registry;
pub mod validator;

pub use handler::ProtocolHandler;
pub use registry::{MethodHandler, MethodRegistry, MethodRegistryBuilder};
pub use validator::{validate_message, Rejected};
