//! In-memory banking ledger.
//!
//! This module holds the domain state of the server: accounts, balances,
//! and per-account transaction histories, plus the transfer engine that
//! performs the only mutating operation.
//!
//! # Architecture
//!
//! - [`model`] — domain/wire types (accounts, balances, transactions, transfers)
//! - [`store`] — the process-wide state holder guarded by one exclusive lock
//! - `transfer` — validation and atomic application of transfers
//! - [`error`] — error types
//!
//! All access to ledger state goes through [`LedgerStore`], which acquires
//! its lock for the full duration of each operation. A transfer is therefore
//! never observable half-applied.

pub mod error;
pub mod model;
pub mod store;
mod transfer;

pub use error::{LedgerError, LedgerResult};
pub use model::{
    Account, Balance, Transaction, TransactionKind, TransferRequest, TransferResponse,
    TransferStatus,
};
pub use store::LedgerStore;

use chrono::{SecondsFormat, Utc};

/// Current time as an RFC 3339 string, the ledger's stored timestamp form.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
