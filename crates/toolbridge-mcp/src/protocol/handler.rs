//! Main request dispatcher — turns one input line into at most one reply.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use toolbridge::CapabilityProvider;

use crate::transport::framing;
use crate::types::*;

use super::registry::MethodRegistry;
use super::validator::validate_message;

/// What processing a single message produced.
#[derive(Debug)]
enum Outcome {
    Reply(JsonRpcResponse),
    /// Notification: never answered.
    Silent,
    /// The handler observed shutdown; nothing may be written.
    Cancelled,
}

/// The protocol handler that validates, batches and dispatches messages.
pub struct ProtocolHandler {
    registry: MethodRegistry,
}

impl ProtocolHandler {
    pub fn new(provider: Arc<dyn CapabilityProvider>) -> Self {
        Self::with_registry(MethodRegistry::with_provider(provider))
    }

    pub fn with_registry(registry: MethodRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Process one non-blank input line.
    ///
    /// Returns `None` when nothing must be written: a notification, an
    /// observed cancellation, or cancellation requested before work began.
    pub async fn handle_line(&self, line: &str, cancel: &CancellationToken) -> Option<Reply> {
        if cancel.is_cancelled() {
            return None;
        }

        match framing::parse_line(line) {
            Ok(value) => self.handle_value(value, cancel).await,
            Err(e) => {
                tracing::debug!("Unparseable line: {e}");
                Some(Reply::Single(JsonRpcResponse::malformed()))
            }
        }
    }

    /// Process an already-parsed top-level JSON value.
    pub async fn handle_value(&self, value: Value, cancel: &CancellationToken) -> Option<Reply> {
        match value {
            Value::Array(items) if items.is_empty() => {
                tracing::debug!("Empty batch rejected");
                Some(Reply::Single(JsonRpcResponse::malformed()))
            }
            Value::Array(items) => Some(Reply::Batch(self.handle_batch(items, cancel).await)),
            single => match self.handle_message(single, cancel).await {
                Outcome::Reply(response) => Some(Reply::Single(response)),
                Outcome::Silent | Outcome::Cancelled => None,
            },
        }
    }

    /// Elements run sequentially in array order. Notifications and
    /// cancelled elements contribute nothing, so an all-notification batch
    /// still yields `[]` and responses finished before a shutdown are kept.
    async fn handle_batch(&self, items: Vec<Value>, cancel: &CancellationToken) -> Vec<JsonRpcResponse> {
        let total = items.len();
        let mut responses = Vec::with_capacity(total);
        for item in items {
            match self.handle_message(item, cancel).await {
                Outcome::Reply(response) => responses.push(response),
                Outcome::Silent => {}
                Outcome::Cancelled => tracing::debug!("Batch element cancelled, no response"),
            }
        }

        let errors = responses.iter().filter(|r| r.is_error()).count();
        tracing::debug!(
            "Batch of {total} produced {} response(s), {errors} error(s)",
            responses.len()
        );
        responses
    }

    async fn handle_message(&self, value: Value, cancel: &CancellationToken) -> Outcome {
        let request = match validate_message(value) {
            Ok(request) => request,
            Err(rejected) => {
                tracing::debug!("Rejected message (id {}): {}", rejected.id, rejected.error);
                return Outcome::Reply(JsonRpcResponse::error(rejected.id, &rejected.error));
            }
        };

        let id = request.response_id();
        let notification = request.is_notification();

        let Some(handler) = self.registry.get(&request.method) else {
            tracing::debug!("Unknown method: {}", request.method);
            if notification {
                return Outcome::Silent;
            }
            return Outcome::Reply(JsonRpcResponse::error(
                id,
                &McpError::MethodNotFound(request.method),
            ));
        };

        match handler.call(request.params, cancel).await {
            Ok(_) if notification => {
                tracing::debug!("Notification {} handled", request.method);
                Outcome::Silent
            }
            Ok(result) => Outcome::Reply(JsonRpcResponse::result(id, result)),
            Err(McpError::Cancelled) => {
                tracing::info!("Method {} cancelled (id {id})", request.method);
                Outcome::Cancelled
            }
            Err(e) => {
                if e.is_internal() {
                    tracing::error!(method = %request.method, id = %id, "Handler failed: {e}");
                } else {
                    tracing::warn!(method = %request.method, id = %id, "Handler rejected request: {e}");
                }
                if notification {
                    Outcome::Silent
                } else {
                    Outcome::Reply(JsonRpcResponse::error(id, &e))
                }
            }
        }
    }
}
