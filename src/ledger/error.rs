//! Error types for ledger operations.

use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur while reading or mutating the ledger.
///
/// Each variant maps to a stable protocol error code at the JSON-RPC
/// boundary; the offending identifier travels in the error's `data` field,
/// not its message.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No balance record exists for the requested account.
    #[error("Account not found: {account_id}")]
    AccountNotFound {
        /// Identifier that was requested.
        account_id: String,
    },

    /// The requested currency does not match both accounts' balances.
    #[error("Currency mismatch")]
    CurrencyMismatch,

    /// The source account's available balance is below the requested amount.
    #[error("Insufficient funds")]
    InsufficientFunds,
}

impl LedgerError {
    /// Creates an account-not-found error.
    pub fn account_not_found(account_id: impl Into<String>) -> Self {
        Self::AccountNotFound {
            account_id: account_id.into(),
        }
    }
}
