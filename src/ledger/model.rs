//! Domain types for the banking ledger.
//!
//! These types double as the wire representation of tool results: they
//! serialise to the camelCase JSON shapes exposed by the protocol surface.
//! Monetary amounts are [`Decimal`] values; the `serde-float` feature keeps
//! them as plain JSON numbers on the wire.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bank account.
///
/// Accounts are immutable for the lifetime of the process; the protocol
/// exposes no account-creation operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account identifier (e.g. "CHK-001").
    pub account_id: String,

    /// Account type tag (e.g. "Checking", "Savings").
    #[serde(rename = "type")]
    pub account_type: String,

    /// ISO 4217 currency code.
    pub currency: String,

    /// Name of the account owner.
    pub owner_name: String,
}

/// Balance record for an account.
///
/// `currency` always equals the owning account's currency. Only the
/// transfer engine mutates balances, and it moves `available` and `ledger`
/// by the same delta, so `ledger - available` (funds on hold) is constant
/// across a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Identifier of the owning account.
    pub account_id: String,

    /// Currently spendable amount.
    pub available: Decimal,

    /// Booked total.
    pub ledger: Decimal,

    /// ISO 4217 currency code.
    pub currency: String,
}

/// Direction of a transaction, redundant with the sign of its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Negative amount; funds leaving the account.
    Debit,
    /// Positive amount; funds entering the account.
    Credit,
}

/// A booked transaction on a single account.
///
/// Histories are append-only and kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier.
    pub transaction_id: String,

    /// RFC 3339 timestamp, stored as text. Date-window filtering skips
    /// entries whose stored date no longer parses instead of failing the
    /// whole call.
    pub date: String,

    /// Human-readable description.
    pub description: String,

    /// Signed amount: negative = debit, positive = credit.
    pub amount: Decimal,

    /// ISO 4217 currency code.
    pub currency: String,

    /// Direction tag.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

/// A request to move funds between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Account to debit.
    pub from_account_id: String,

    /// Account to credit.
    pub to_account_id: String,

    /// Amount to move; must be strictly positive.
    pub amount: Decimal,

    /// Requested currency; must match both accounts.
    pub currency: String,

    /// Optional description applied to both booked transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Status vocabulary for a transfer response.
///
/// `Pending` and `Failed` are reserved wire vocabulary; the transfer engine
/// only ever produces `Completed` (failures are reported as errors, not as
/// a status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Reserved; never produced.
    Pending,
    /// The transfer was applied in full.
    Completed,
    /// Reserved; never produced.
    Failed,
}

/// Outcome of a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    /// Generated transfer identifier, shared by the paired transactions.
    pub transfer_id: String,

    /// Transfer status.
    pub status: TransferStatus,

    /// RFC 3339 timestamp shared by the paired debit/credit transactions.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn account_wire_shape() {
        let account = Account {
            account_id: "CHK-001".to_string(),
            account_type: "Checking".to_string(),
            currency: "USD".to_string(),
            owner_name: "Jane Doe".to_string(),
        };

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(
            value,
            json!({
                "accountId": "CHK-001",
                "type": "Checking",
                "currency": "USD",
                "ownerName": "Jane Doe",
            })
        );
    }

    #[test]
    fn balance_amounts_serialise_as_numbers() {
        let balance = Balance {
            account_id: "CHK-001".to_string(),
            available: dec!(1250.75),
            ledger: dec!(1300.00),
            currency: "USD".to_string(),
        };

        let value = serde_json::to_value(&balance).unwrap();
        assert_eq!(value["available"], json!(1250.75));
        assert_eq!(value["ledger"], json!(1300.0));
    }

    #[test]
    fn transaction_kind_tag() {
        let transaction = Transaction {
            transaction_id: "tx-1001".to_string(),
            date: "2026-08-08T12:00:00Z".to_string(),
            description: "Coffee shop".to_string(),
            amount: dec!(-4.50),
            currency: "USD".to_string(),
            kind: TransactionKind::Debit,
        };

        let value = serde_json::to_value(&transaction).unwrap();
        assert_eq!(value["type"], json!("debit"));
        assert_eq!(value["amount"], json!(-4.5));
    }

    #[test]
    fn transfer_request_from_wire() {
        let request: TransferRequest = serde_json::from_value(json!({
            "fromAccountId": "CHK-001",
            "toAccountId": "SAV-001",
            "amount": 100.00,
            "currency": "USD",
        }))
        .unwrap();

        assert_eq!(request.from_account_id, "CHK-001");
        assert_eq!(request.amount, dec!(100));
        assert!(request.description.is_none());
    }

    #[test]
    fn transfer_status_lowercase() {
        assert_eq!(
            serde_json::to_value(TransferStatus::Completed).unwrap(),
            json!("completed")
        );
        assert_eq!(
            serde_json::to_value(TransferStatus::Pending).unwrap(),
            json!("pending")
        );
    }
}
