//! Error types and the published error code registry.

use serde::{Deserialize, Serialize};

use toolbridge::ProviderError;

use super::message::{ErrorObject, PROTOCOL_VERSION};

/// Published error codes. Values are never reused for a different meaning.
pub mod error_codes {
    pub const INVALID_REQUEST: i32 = 2000;
    pub const METHOD_NOT_FOUND: i32 = 2001;
    pub const INVALID_PARAMS: i32 = 2002;
    pub const INTERNAL_ERROR: i32 = 2003;
}

const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred while processing the request.";

/// Structured context attached to an error response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_hint: Option<String>,
}

/// All errors that can occur in the server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Invalid JSON-RPC request payload.")]
    MalformedPayload,

    #[error("Unsupported protocolVersion; expected \"2.0\".")]
    UnsupportedVersion,

    #[error("Request method must be a non-empty string.")]
    MissingMethod,

    #[error("Method '{0}' not found.")]
    MethodNotFound(String),

    #[error("Invalid params: {message}")]
    InvalidParams {
        message: String,
        parameter: Option<String>,
    },

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        match self {
            McpError::MalformedPayload | McpError::UnsupportedVersion | McpError::MissingMethod => {
                INVALID_REQUEST
            }
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams { .. } => INVALID_PARAMS,
            McpError::InternalError(_)
            | McpError::Cancelled
            | McpError::Io(_)
            | McpError::Json(_) => INTERNAL_ERROR,
        }
    }

    /// True for failures whose detail must stay in the server log.
    pub fn is_internal(&self) -> bool {
        self.code() == error_codes::INTERNAL_ERROR
    }

    /// Render the client-facing error object.
    pub fn to_error_object(&self) -> ErrorObject {
        if self.is_internal() {
            return ErrorObject {
                code: error_codes::INTERNAL_ERROR,
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                data: Some(ErrorData {
                    suggestion: Some(
                        "Retry the request. If the failure persists, report it together with the server log."
                            .to_string(),
                    ),
                    recovery_hint: Some(
                        "Diagnostic details were written to the server log (stderr).".to_string(),
                    ),
                    ..Default::default()
                }),
            };
        }

        let data = match self {
            McpError::UnsupportedVersion => Some(ErrorData {
                suggestion: Some(format!("Set protocolVersion to \"{PROTOCOL_VERSION}\".")),
                ..Default::default()
            }),
            McpError::MissingMethod => Some(ErrorData {
                suggestion: Some("Provide the method name as a non-empty string.".to_string()),
                ..Default::default()
            }),
            McpError::InvalidParams { parameter, .. } => Some(ErrorData {
                parameter_name: parameter.clone(),
                suggestion: Some("Check the params against the method's documented shape.".to_string()),
                ..Default::default()
            }),
            _ => None,
        };

        ErrorObject {
            code: self.code(),
            message: self.to_string(),
            data,
        }
    }
}

impl From<ProviderError> for McpError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Cancelled => McpError::Cancelled,
            other => McpError::InternalError(other.to_string()),
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(McpError::MalformedPayload.code(), 2000);
        assert_eq!(McpError::UnsupportedVersion.code(), 2000);
        assert_eq!(McpError::MissingMethod.code(), 2000);
        assert_eq!(McpError::MethodNotFound("x".into()).code(), 2001);
        let params = McpError::InvalidParams {
            message: "bad".into(),
            parameter: None,
        };
        assert_eq!(params.code(), 2002);
        assert_eq!(McpError::InternalError("boom".into()).code(), 2003);
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = McpError::InternalError("database password is hunter2".into());
        let obj = err.to_error_object();
        assert_eq!(obj.code, error_codes::INTERNAL_ERROR);
        let rendered = serde_json::to_string(&obj).unwrap();
        assert!(!rendered.contains("hunter2"));
        let data = obj.data.unwrap();
        assert!(data.suggestion.is_some());
        assert!(data.recovery_hint.unwrap().contains("server log"));
    }

    #[test]
    fn test_io_renders_as_internal() {
        let err = McpError::Io(std::io::Error::other("disk on fire"));
        let obj = err.to_error_object();
        assert_eq!(obj.code, 2003);
        assert!(!obj.message.contains("disk on fire"));
    }

    #[test]
    fn test_method_not_found_message() {
        let obj = McpError::MethodNotFound("tools/nonexistent".into()).to_error_object();
        assert_eq!(obj.message, "Method 'tools/nonexistent' not found.");
        assert!(obj.data.is_none());
    }

    #[test]
    fn test_invalid_params_carries_parameter_name() {
        let obj = McpError::InvalidParams {
            message: "cursor must be a string".into(),
            parameter: Some("cursor".into()),
        }
        .to_error_object();
        assert_eq!(obj.data.unwrap().parameter_name.as_deref(), Some("cursor"));
    }

    #[test]
    fn test_provider_error_mapping() {
        assert!(matches!(
            McpError::from(ProviderError::Cancelled),
            McpError::Cancelled
        ));
        assert!(matches!(
            McpError::from(ProviderError::Unavailable("host down".into())),
            McpError::InternalError(_)
        ));
    }
}
