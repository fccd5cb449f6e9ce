//! MCP server for the banking ledger.
//!
//! This module implements the request/response loop:
//!
//! 1. Read one JSON object per input line
//! 2. Dispatch by method name to exactly one handler
//! 3. Write exactly one response line, echoing the request id verbatim
//!
//! Transport-level failures (malformed lines, read errors) are reported
//! per line and never terminate the loop; end of input and SIGINT/SIGTERM
//! terminate it cleanly.
//!
//! # Methods
//!
//! - `ping`
//! - `resources/list`, `resources/read`
//! - `tools/list`, `tools/call`

use std::io;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite, Stdin, Stdout};

use crate::ledger::{LedgerError, LedgerStore};
use crate::mcp::protocol::{
    parse_request, ErrorCode, JsonRpcError, JsonRpcErrorData, JsonRpcRequest, JsonRpcResponse,
};
use crate::mcp::resources::{self, ResourceError};
use crate::mcp::tools::{self, ToolCallParams, ToolError};
use crate::mcp::transport::Transport;

/// Parameters of a `resources/read` request.
#[derive(Debug, Clone, Deserialize)]
struct ReadResourceParams {
    /// URI of the resource to read.
    #[serde(default)]
    uri: String,
}

/// The MCP server for the banking ledger.
///
/// Owns the transport and a shared handle to the ledger store; the store
/// is injected so tests can construct isolated instances.
pub struct McpServer<R, W> {
    /// The shared ledger state.
    store: Arc<LedgerStore>,
    /// The transport layer.
    transport: Transport<R, W>,
}

impl McpServer<Stdin, Stdout> {
    /// Creates a server over the standard stdio transport.
    #[must_use]
    pub fn stdio(store: Arc<LedgerStore>) -> Self {
        Self::new(store, Transport::stdio())
    }
}

impl<R, W> McpServer<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a server over an arbitrary transport.
    pub fn new(store: Arc<LedgerStore>, transport: Transport<R, W>) -> Self {
        Self { store, transport }
    }

    /// Consumes the server, returning its transport.
    ///
    /// Used by tests to inspect everything that was written.
    pub fn into_transport(self) -> Transport<R, W> {
        self.transport
    }

    /// Runs the server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if writing a response fails; read failures short
    /// of EOF are reported to the client and the loop continues.
    pub async fn run(&mut self) -> io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown signals.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, shutting down");
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, shutting down");
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown signals.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, shutting down");
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from a transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: io::Result<Option<String>>,
    ) -> io::Result<bool> {
        match line_result {
            // EOF - clean termination
            Ok(None) => Ok(true),
            Ok(Some(line)) => {
                if !line.trim().is_empty() {
                    self.handle_line(&line).await?;
                }
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Transport read error");
                self.transport
                    .write_error(&JsonRpcError::read_error(&e.to_string()))
                    .await?;
                Ok(false)
            }
        }
    }

    /// Handles a single line of input.
    async fn handle_line(&mut self, line: &str) -> io::Result<()> {
        match parse_request(line) {
            Ok(request) => self.handle_request(&request).await,
            Err(error) => self.transport.write_error(&error).await,
        }
    }

    /// Handles a parsed request: dispatch, then write exactly one response.
    async fn handle_request(&mut self, request: &JsonRpcRequest) -> io::Result<()> {
        match self.dispatch(request) {
            Ok(response) => self.transport.write_response(&response).await,
            Err(error) => self.transport.write_error(&error).await,
        }
    }

    /// Routes a request by method name to exactly one handler.
    fn dispatch(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        tracing::debug!(method = %request.method, "Dispatching request");

        match request.method.as_str() {
            "ping" => Ok(Self::handle_ping(request)),
            "resources/list" => self.handle_resources_list(request),
            "resources/read" => self.handle_resources_read(request),
            "tools/list" => Self::handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => Err(JsonRpcError::method_not_found(
                request.id.clone(),
                &request.method,
            )),
        }
    }

    /// Handles the ping request.
    fn handle_ping(request: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(request.id.clone(), json!({"message": "pong"}))
    }

    /// Handles the resources/list request.
    fn handle_resources_list(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        let listing = resources::list_resources(&self.store);
        let result = to_result_value(&request.id, &listing)?;
        Ok(JsonRpcResponse::success(request.id.clone(), result))
    }

    /// Handles the resources/read request.
    fn handle_resources_read(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        let params: ReadResourceParams = parse_params(request, "Missing uri")?;
        if params.uri.is_empty() {
            return Err(JsonRpcError::invalid_params(
                request.id.clone(),
                "Missing uri",
            ));
        }

        let contents = resources::read_resource(&self.store, &params.uri)
            .map_err(|e| resource_error(request.id.clone(), &e))?;

        let result = to_result_value(&request.id, &contents)?;
        Ok(JsonRpcResponse::success(request.id.clone(), result))
    }

    /// Handles the tools/list request.
    fn handle_tools_list(request: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        let definitions = tools::tool_definitions();
        let result = to_result_value(&request.id, &json!({ "tools": definitions }))?;
        Ok(JsonRpcResponse::success(request.id.clone(), result))
    }

    /// Handles the tools/call request.
    fn handle_tools_call(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        let params: ToolCallParams = parse_params(request, "Missing tool call params")?;

        let output = tools::call_tool(&self.store, &params.name, params.arguments.as_ref())
            .map_err(|e| tool_error(request.id.clone(), &e))?;

        let result = to_result_value(&request.id, &output)?;
        Ok(JsonRpcResponse::success(request.id.clone(), result))
    }
}

/// Deserialises a request's params into their typed form.
fn parse_params<T: DeserializeOwned>(
    request: &JsonRpcRequest,
    missing_message: &str,
) -> Result<T, JsonRpcError> {
    let params = request
        .params
        .as_ref()
        .ok_or_else(|| JsonRpcError::invalid_params(request.id.clone(), missing_message))?;

    serde_json::from_value(params.clone()).map_err(|e| {
        JsonRpcError::invalid_params(request.id.clone(), format!("Invalid params: {e}"))
    })
}

/// Serialises a handler result at the protocol boundary.
fn to_result_value<T: Serialize>(id: &Option<Value>, value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialise result");
        JsonRpcError::internal_error(id.clone(), "Internal error: failed to serialise result")
    })
}

/// Maps a ledger failure to its protocol error, id/data attached.
fn ledger_error(id: Option<Value>, err: &LedgerError) -> JsonRpcError {
    let error = match err {
        LedgerError::AccountNotFound { account_id } => {
            JsonRpcErrorData::from_code(ErrorCode::AccountNotFound).with_data(json!(account_id))
        }
        LedgerError::CurrencyMismatch => JsonRpcErrorData::from_code(ErrorCode::CurrencyMismatch),
        LedgerError::InsufficientFunds => {
            JsonRpcErrorData::from_code(ErrorCode::InsufficientFunds)
        }
    };
    JsonRpcError::new(id, error)
}

/// Maps a resource resolution failure to its protocol error.
fn resource_error(id: Option<Value>, err: &ResourceError) -> JsonRpcError {
    match err {
        ResourceError::Ledger(e) => ledger_error(id, e),
        ResourceError::UnknownPath { uri } => JsonRpcError::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::MethodNotFound, "Unknown resource path")
                .with_data(json!(uri)),
        ),
        ResourceError::UnknownResource { uri } => JsonRpcError::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::MethodNotFound, "Unknown resource")
                .with_data(json!(uri)),
        ),
    }
}

/// Maps a tool dispatch failure to its protocol error.
fn tool_error(id: Option<Value>, err: &ToolError) -> JsonRpcError {
    match err {
        ToolError::InvalidParams { message, data } => {
            let mut error = JsonRpcErrorData::with_message(ErrorCode::InvalidParams, message);
            if let Some(data) = data {
                error = error.with_data(data.clone());
            }
            JsonRpcError::new(id, error)
        }
        ToolError::UnknownTool { name } => JsonRpcError::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::MethodNotFound, "Unknown tool")
                .with_data(json!(name)),
        ),
        ToolError::Ledger(e) => ledger_error(id, e),
    }
}
