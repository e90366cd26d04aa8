//! Stdio transport — reads JSON-RPC lines from stdin, writes replies to stdout.
//!
//! [`StdioTransport::serve`] works over any buffered reader and writer, so
//! tests drive the exact same loop with in-memory buffers.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::config::RunMode;
use crate::protocol::ProtocolHandler;
use crate::types::{JsonRpcResponse, McpError, McpResult, Reply};

use super::framing;

/// Line-delimited transport for desktop assistant clients.
pub struct StdioTransport {
    handler: ProtocolHandler,
    mode: RunMode,
}

impl StdioTransport {
    pub fn with_mode(handler: ProtocolHandler, mode: RunMode) -> Self {
        Self { handler, mode }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Run the transport loop over the process's stdin and stdout.
    pub async fn run(&self, cancel: &CancellationToken) -> McpResult<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer, cancel).await
    }

    /// Run the transport loop over arbitrary streams.
    ///
    /// A bad line never ends the loop; only I/O failures on the streams
    /// themselves are returned.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W, cancel: &CancellationToken) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        let mut handled = 0usize;

        tracing::info!("Transport started ({:?})", self.mode);

        loop {
            if let RunMode::Lines(max) = self.mode {
                if handled >= max {
                    tracing::info!("Handled {handled} line(s), stopping");
                    break;
                }
            }

            if cancel.is_cancelled() {
                tracing::info!("Cancellation requested, stopping");
                break;
            }

            buf.clear();
            let read = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = reader.read_until(b'\n', &mut buf) => Some(result),
            };

            let Some(result) = read else {
                tracing::info!("Cancellation requested while waiting for input, stopping");
                break;
            };
            let bytes_read = result.map_err(McpError::Io)?;

            if bytes_read == 0 {
                if self.mode == RunMode::UntilCancelled {
                    tracing::info!("EOF on input, waiting for cancellation");
                    cancel.cancelled().await;
                } else {
                    tracing::info!("EOF on input, shutting down");
                }
                break;
            }

            let reply = match framing::decode_line(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    handled += 1;
                    self.handler.handle_line(line.trim(), cancel).await
                }
                Err(_) => {
                    handled += 1;
                    tracing::warn!("Discarding line that is not valid UTF-8");
                    Some(Reply::Single(JsonRpcResponse::malformed()))
                }
            };

            if let Some(reply) = reply {
                write_reply(&mut writer, &reply).await?;
            }
        }

        Ok(())
    }
}

async fn write_reply<W: AsyncWrite + Unpin>(writer: &mut W, reply: &Reply) -> McpResult<()> {
    let framed = framing::frame_or_internal_error(reply, reply.response_id())?;
    writer
        .write_all(framed.as_bytes())
        .await
        .map_err(McpError::Io)?;
    writer.flush().await.map_err(McpError::Io)?;
    Ok(())
}
