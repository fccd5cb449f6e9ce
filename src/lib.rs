//! bank-ledger-mcp: MCP server exposing a mock banking ledger
//!
//! This library implements a JSON-RPC 2.0 request/response server over a
//! newline-delimited byte stream, backed by an in-memory financial ledger.
//!
//! # Architecture
//!
//! The server exposes the ledger through two surfaces:
//!
//! - **Resources**: read-only textual views addressed by `bank://` URIs
//!   (`resources/list`, `resources/read`)
//! - **Tools**: named, argument-taking operations returning structured
//!   data (`tools/list`, `tools/call`) — account listing, balances,
//!   transaction histories, and transfers
//!
//! All state lives in one [`ledger::LedgerStore`] created at startup with
//! fixed seed data; transfers are the only mutation and are applied
//! atomically under the store's exclusive lock.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Startup error types
//! - [`ledger`] — Accounts, balances, transactions, and the transfer engine
//! - [`mcp`] — JSON-RPC protocol, transport, and dispatch

pub mod config;
pub mod error;
pub mod ledger;
pub mod mcp;
