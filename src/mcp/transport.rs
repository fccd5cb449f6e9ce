//! Newline-delimited JSON transport.
//!
//! Messages are UTF-8 encoded JSON-RPC objects, one per line, with no
//! embedded newlines. In the standard deployment stdin receives requests
//! and stdout carries responses; stderr is reserved for logging. The
//! transport is generic over its byte streams so tests can drive the full
//! dispatch loop over in-memory buffers.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

use crate::mcp::protocol::{JsonRpcError, JsonRpcResponse};

/// A line-delimited JSON-RPC transport over a byte-oriented duplex stream.
pub struct Transport<R, W> {
    /// Buffered reader for the request stream.
    reader: BufReader<R>,
    /// Handle for the response stream.
    writer: W,
}

impl Transport<Stdin, Stdout> {
    /// Creates the standard stdio transport.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl Default for Transport<Stdin, Stdout> {
    fn default() -> Self {
        Self::stdio()
    }
}

impl<R, W> Transport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport over arbitrary byte streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Reads the next message line from the request stream.
    ///
    /// Returns `None` on clean end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails short of EOF.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            // EOF - input closed
            return Ok(None);
        }

        // Remove the trailing newline
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }

    /// Writes a JSON-RPC success response, newline terminated.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.write_raw(&json).await
    }

    /// Writes a JSON-RPC error response, newline terminated.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_error(&mut self, error: &JsonRpcError) -> io::Result<()> {
        let json = serde_json::to_string(error)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.write_raw(&json).await
    }

    /// Writes a raw JSON string with newline termination.
    async fn write_raw(&mut self, json: &str) -> io::Result<()> {
        // One message per line; embedded newlines would split the frame
        debug_assert!(
            !json.contains('\n'),
            "JSON message must not contain embedded newlines"
        );

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }

    /// Consumes the transport, returning the response stream.
    ///
    /// Used by tests to inspect everything the server wrote.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transport_default() {
        // Just ensure Default is implemented and doesn't panic
        let _transport = Transport::default();
    }

    #[tokio::test]
    async fn read_line_trims_crlf() {
        let input: &[u8] = b"{\"jsonrpc\": \"2.0\"}\r\n";
        let mut transport = Transport::new(input, Vec::new());

        let line = transport.read_line().await.unwrap().unwrap();
        assert_eq!(line, "{\"jsonrpc\": \"2.0\"}");
    }

    #[tokio::test]
    async fn read_line_returns_none_at_eof() {
        let input: &[u8] = b"";
        let mut transport = Transport::new(input, Vec::new());

        assert!(transport.read_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_response_appends_newline() {
        let input: &[u8] = b"";
        let mut transport = Transport::new(input, Vec::new());

        let response = JsonRpcResponse::success(Some(json!(1)), json!({"ok": true}));
        transport.write_response(&response).await.unwrap();

        let written = transport.into_writer();
        let text = String::from_utf8(written).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
    }

    #[tokio::test]
    async fn serialise_error_no_newlines() {
        let error = JsonRpcError::method_not_found(Some(json!(1)), "test/method");

        let json = serde_json::to_string(&error).unwrap();
        assert!(
            !json.contains('\n'),
            "Serialised JSON should not contain newlines"
        );
    }
}
