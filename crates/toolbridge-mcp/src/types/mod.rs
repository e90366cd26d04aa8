//! Wire data types used by the server.

pub mod error;
pub mod message;

pub use error::*;
pub use message::*;
