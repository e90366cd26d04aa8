//! JSON-RPC 2.0 message types as exchanged on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ErrorData, McpError};

/// The only accepted `protocolVersion` value.
pub const PROTOCOL_VERSION: &str = "2.0";

/// A structurally valid request or notification.
///
/// `id` is an opaque echo value. `None` (absent or explicit `null`) marks a
/// notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRpcRequest {
    pub protocol_version: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// The id to echo in a response, `null` for notifications.
    pub fn response_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }
}

/// Error object within an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

/// Exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseOutcome {
    Result(Value),
    Error(ErrorObject),
}

/// A single response line (or batch element).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRpcResponse {
    pub protocol_version: String,
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
    pub id: Value,
}

impl JsonRpcResponse {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            outcome: ResponseOutcome::Result(result),
            id,
        }
    }

    pub fn error(id: Value, error: &McpError) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            outcome: ResponseOutcome::Error(error.to_error_object()),
            id,
        }
    }

    /// Response for input whose id could not be determined.
    pub fn malformed() -> Self {
        Self::error(Value::Null, &McpError::MalformedPayload)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ResponseOutcome::Error(_))
    }
}

/// Everything the server writes for one input line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Single(JsonRpcResponse),
    Batch(Vec<JsonRpcResponse>),
}

impl Reply {
    /// Id to answer with if this reply cannot be written; `null` for a batch.
    pub fn response_id(&self) -> Value {
        match self {
            Reply::Single(response) => response.id.clone(),
            Reply::Batch(_) => Value::Null,
        }
    }
}
