//! Named tools over the ledger.
//!
//! This is the structured-call surface: each tool takes a JSON arguments
//! payload, validates it into a typed argument struct, and delegates to
//! the ledger store. Results stay strongly typed ([`ToolOutput`]) and are
//! serialised to their wire shape only at the protocol boundary.
//!
//! Exactly four tools are defined:
//!
//! - `list_accounts` — no arguments; all accounts
//! - `get_balance` — requires `accountId`
//! - `list_transactions` — requires `accountId`; optional `fromDate`/`toDate`
//! - `create_transfer` — requires `fromAccountId`, `toAccountId`,
//!   a strictly positive `amount`, and `currency`

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::ledger::{
    Account, Balance, LedgerError, LedgerStore, Transaction, TransferRequest, TransferResponse,
};

/// Parameters of a `tools/call` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,

    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// A tool definition for the `tools/list` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Strongly-typed result of a tool invocation.
///
/// Serialises untagged, so the wire payload is the bare domain value.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// `list_accounts` result.
    Accounts(Vec<Account>),
    /// `get_balance` result.
    Balance(Balance),
    /// `list_transactions` result.
    Transactions(Vec<Transaction>),
    /// `create_transfer` result.
    Transfer(TransferResponse),
}

/// Errors produced by tool dispatch.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments were missing, unparsable, or failed validation.
    #[error("{message}")]
    InvalidParams {
        /// What the tool requires.
        message: String,
        /// The offending value, where one can be named.
        data: Option<Value>,
    },

    /// No tool with the requested name exists.
    #[error("Unknown tool: {name}")]
    UnknownTool {
        /// The requested tool name.
        name: String,
    },

    /// The ledger rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ToolError {
    fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
            data: None,
        }
    }

    fn invalid_value(message: impl Into<String>, data: Value) -> Self {
        Self::InvalidParams {
            message: message.into(),
            data: Some(data),
        }
    }
}

const GET_BALANCE_REQUIRES: &str = "get_balance requires accountId";
const LIST_TRANSACTIONS_REQUIRES: &str = "list_transactions requires accountId";
const CREATE_TRANSFER_REQUIRES: &str =
    "create_transfer requires fromAccountId, toAccountId, amount>0, currency";

/// Arguments of `get_balance`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceArgs {
    #[serde(default)]
    account_id: String,
}

/// Arguments of `list_transactions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionsArgs {
    #[serde(default)]
    account_id: String,
    #[serde(default)]
    from_date: Option<String>,
    #[serde(default)]
    to_date: Option<String>,
}

/// Dispatches a named tool call against the ledger.
///
/// # Errors
///
/// Returns [`ToolError::UnknownTool`] for an unrecognised name,
/// [`ToolError::InvalidParams`] when arguments fail validation, and
/// forwards ledger failures unchanged.
pub fn call_tool(
    store: &LedgerStore,
    name: &str,
    arguments: Option<&Value>,
) -> Result<ToolOutput, ToolError> {
    match name {
        "list_accounts" => Ok(ToolOutput::Accounts(store.list_accounts())),
        "get_balance" => get_balance(store, arguments),
        "list_transactions" => list_transactions(store, arguments),
        "create_transfer" => create_transfer(store, arguments),
        _ => Err(ToolError::UnknownTool {
            name: name.to_string(),
        }),
    }
}

fn get_balance(store: &LedgerStore, arguments: Option<&Value>) -> Result<ToolOutput, ToolError> {
    let args: BalanceArgs = parse_args(arguments, GET_BALANCE_REQUIRES)?;
    if args.account_id.is_empty() {
        return Err(ToolError::invalid_params(GET_BALANCE_REQUIRES));
    }

    Ok(ToolOutput::Balance(store.get_balance(&args.account_id)?))
}

fn list_transactions(
    store: &LedgerStore,
    arguments: Option<&Value>,
) -> Result<ToolOutput, ToolError> {
    let args: TransactionsArgs = parse_args(arguments, LIST_TRANSACTIONS_REQUIRES)?;
    if args.account_id.is_empty() {
        return Err(ToolError::invalid_params(LIST_TRANSACTIONS_REQUIRES));
    }

    let from = parse_date(args.from_date.as_deref(), "fromDate")?;
    let to = parse_date(args.to_date.as_deref(), "toDate")?;

    Ok(ToolOutput::Transactions(store.list_transactions(
        &args.account_id,
        from,
        to,
    )?))
}

fn create_transfer(
    store: &LedgerStore,
    arguments: Option<&Value>,
) -> Result<ToolOutput, ToolError> {
    let request: TransferRequest = parse_args(arguments, CREATE_TRANSFER_REQUIRES)?;
    if request.from_account_id.is_empty()
        || request.to_account_id.is_empty()
        || request.amount <= Decimal::ZERO
        || request.currency.is_empty()
    {
        return Err(ToolError::invalid_params(CREATE_TRANSFER_REQUIRES));
    }

    Ok(ToolOutput::Transfer(store.transfer(&request)?))
}

/// Deserialises a tool's arguments payload into its typed form.
fn parse_args<T: DeserializeOwned>(
    arguments: Option<&Value>,
    requirement: &str,
) -> Result<T, ToolError> {
    let value = arguments.ok_or_else(|| ToolError::invalid_params(requirement))?;
    serde_json::from_value(value.clone()).map_err(|_| ToolError::invalid_params(requirement))
}

/// Parses an optional `YYYY-MM-DD` calendar date argument.
///
/// Empty strings count as absent; an unparsable value is an invalid-params
/// error naming the field and carrying the offending value.
fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, ToolError> {
    raw.filter(|value| !value.is_empty())
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| ToolError::invalid_value(format!("Invalid {field}"), json!(value)))
        })
        .transpose()
}

/// Returns the definitions of the four available tools.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "list_accounts".to_string(),
            description: Some(
                "List all accounts for the current user with their type, currency, and owner."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: "get_balance".to_string(),
            description: Some(
                "Get the available and ledger balance for a single account.".to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "accountId": {
                        "type": "string",
                        "description": "Account identifier (e.g. 'CHK-001')"
                    }
                },
                "required": ["accountId"]
            }),
        },
        ToolDefinition {
            name: "list_transactions".to_string(),
            description: Some(
                "List an account's transactions, optionally windowed by calendar date. \
                 Both bounds are inclusive; the upper bound covers the entire day."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "accountId": {
                        "type": "string",
                        "description": "Account identifier"
                    },
                    "fromDate": {
                        "type": "string",
                        "description": "Optional: earliest date to include (YYYY-MM-DD)"
                    },
                    "toDate": {
                        "type": "string",
                        "description": "Optional: latest date to include (YYYY-MM-DD)"
                    }
                },
                "required": ["accountId"]
            }),
        },
        ToolDefinition {
            name: "create_transfer".to_string(),
            description: Some(
                "Move funds between two accounts. Debits the source and credits the \
                 destination atomically, booking one transaction on each side."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "fromAccountId": {
                        "type": "string",
                        "description": "Account to debit"
                    },
                    "toAccountId": {
                        "type": "string",
                        "description": "Account to credit"
                    },
                    "amount": {
                        "type": "number",
                        "description": "Amount to move; must be strictly positive",
                        "exclusiveMinimum": 0
                    },
                    "currency": {
                        "type": "string",
                        "description": "ISO 4217 currency code; must match both accounts"
                    },
                    "description": {
                        "type": "string",
                        "description": "Optional description applied to both transactions"
                    }
                },
                "required": ["fromAccountId", "toAccountId", "amount", "currency"]
            }),
        },
    ]
}
