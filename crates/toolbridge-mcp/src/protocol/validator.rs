//! Structural validation of incoming JSON-RPC messages.

use serde_json::Value;

use crate::types::{JsonRpcRequest, McpError, PROTOCOL_VERSION};

/// A message that failed validation, with the id to answer it under.
#[derive(Debug)]
pub struct Rejected {
    pub id: Value,
    pub error: McpError,
}

/// Turn a parsed JSON value into a request or notification.
///
/// Rules are checked in order and the first failure wins, so later fields
/// such as `params` are never inspected for a message that already failed.
pub fn validate_message(value: Value) -> Result<JsonRpcRequest, Rejected> {
    let Value::Object(mut obj) = value else {
        return Err(Rejected {
            id: Value::Null,
            error: McpError::MalformedPayload,
        });
    };

    let id = obj.remove("id").unwrap_or(Value::Null);

    let version_ok = matches!(obj.get("protocolVersion"), Some(Value::String(v)) if v == PROTOCOL_VERSION);
    if !version_ok {
        return Err(Rejected {
            id,
            error: McpError::UnsupportedVersion,
        });
    }

    let method = match obj.remove("method") {
        Some(Value::String(m)) if !m.is_empty() => m,
        _ => {
            return Err(Rejected {
                id,
                error: McpError::MissingMethod,
            })
        }
    };

    Ok(JsonRpcRequest {
        protocol_version: PROTOCOL_VERSION.to_string(),
        method,
        params: obj.remove("params"),
        id: match id {
            Value::Null => None,
            other => Some(other),
        },
    })
}
