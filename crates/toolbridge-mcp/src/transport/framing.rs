//! Message framing for newline-delimited JSON.

use serde::Serialize;
use serde_json::Value;

use crate::types::{JsonRpcResponse, McpError, McpResult};

/// Decode raw line bytes; anything that is not UTF-8 is a malformed payload.
pub fn decode_line(bytes: &[u8]) -> McpResult<&str> {
    std::str::from_utf8(bytes).map_err(|_| McpError::MalformedPayload)
}

/// Parse a single line of text as a JSON value.
pub fn parse_line(line: &str) -> McpResult<Value> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::MalformedPayload);
    }

    serde_json::from_str(trimmed).map_err(McpError::Json)
}

/// Serialize a message to a JSON line (with trailing newline).
pub fn frame_message<T: Serialize>(message: &T) -> McpResult<String> {
    let mut json = serde_json::to_string(message).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}

/// Frame `message`, or a 2003 InternalError line for `fallback_id` when it
/// cannot be serialized.
pub fn frame_or_internal_error<T: Serialize>(message: &T, fallback_id: Value) -> McpResult<String> {
    match frame_message(message) {
        Ok(framed) => Ok(framed),
        Err(e) => {
            tracing::error!("Failed to serialize reply: {e}");
            let fallback = JsonRpcResponse::error(
                fallback_id,
                &McpError::InternalError(format!("reply serialization failed: {e}")),
            );
            frame_message(&fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_and_array() {
        assert!(parse_line(r#"{"a":1}"#).unwrap().is_object());
        assert!(parse_line("  [1, 2]\r\n").unwrap().is_array());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_line("{not valid json}").is_err());
        assert!(parse_line(r#"{"protocolVersion":"2.0","id":1,"method":"#).is_err());
        assert!(parse_line("").is_err());
    }

    #[test]
    fn test_parse_rejects_trailing_data() {
        assert!(parse_line(r#"{"a":1} {"b":2}"#).is_err());
    }

    #[test]
    fn test_frame_is_single_line() {
        let framed = frame_message(&json!({ "text": "line one\nline two" })).unwrap();
        assert!(framed.ends_with('\n'));
        assert_eq!(framed.matches('\n').count(), 1);
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }

    #[test]
    fn test_unserializable_reply_becomes_internal_error() {
        let framed = frame_or_internal_error(&Unserializable, json!(9)).unwrap();
        assert_eq!(framed.matches('\n').count(), 1);
        let v: Value = serde_json::from_str(framed.trim()).unwrap();
        assert_eq!(v["id"], 9);
        assert_eq!(v["error"]["code"], 2003);
        assert!(!v["error"]["message"].as_str().unwrap().contains("refused"));
    }

    #[test]
    fn test_serializable_reply_passes_through() {
        let framed = frame_or_internal_error(&json!({ "a": 1 }), Value::Null).unwrap();
        assert_eq!(framed, "{\"a\":1}\n");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(decode_line(&[0x7b, 0xff, 0x7d]).is_err());
        assert_eq!(decode_line(b"{}").unwrap(), "{}");
    }
}
