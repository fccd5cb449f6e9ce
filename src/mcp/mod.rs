//! MCP-style JSON-RPC server surface for the banking ledger.
//!
//! The server communicates over a newline-delimited JSON transport
//! (stdio in the standard deployment) and exposes the ledger two ways:
//! read-only textual resources addressed by `bank://` URIs, and named
//! tools returning structured data.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                           MCP Server                           │
//! │                                                                │
//! │   ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐   │
//! │   │  Transport  │───▶│   Server    │───▶│ Resources/Tools  │   │
//! │   │ (line JSON) │    │ (dispatch)  │    │    (handlers)    │   │
//! │   └─────────────┘    └─────────────┘    └──────────────────┘   │
//! │          │                  │                     │            │
//! │          ▼                  ▼                     ▼            │
//! │   ┌────────────────────────────────────────────────────────┐   │
//! │   │             JSON-RPC Messages / Ledger Store           │   │
//! │   └────────────────────────────────────────────────────────┘   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests are processed strictly one at a time in arrival order, so
//! response order always matches request order.

pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
pub use server::McpServer;
pub use transport::Transport;
