//! Resource resolution for the `bank://` URI scheme.
//!
//! Resources are read-only textual views over ledger data, named by a
//! hierarchical URI and computed on demand — nothing here is stored.
//!
//! # URI Grammar
//!
//! - `bank://accounts` — all accounts
//! - `bank://accounts/{id}` — single account detail
//! - `bank://accounts/{id}/balance` — current balance
//! - `bank://accounts/{id}/transactions` — transaction history
//!
//! Every URI returned by [`list_resources`] resolves through
//! [`read_resource`] without error.

use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;

use crate::ledger::{Account, LedgerError, LedgerStore, TransactionKind};

/// URI of the accounts collection resource.
const ACCOUNTS_URI: &str = "bank://accounts";

/// Prefix of all per-account resource URIs.
const ACCOUNT_PREFIX: &str = "bank://accounts/";

/// An addressable, read-only view over ledger data.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    /// Hierarchical resource URI.
    pub uri: String,

    /// Display name.
    pub name: String,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Text rendering of a resource, bound to the URI it was read from.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceContents {
    /// The URI that was resolved.
    pub uri: String,

    /// Human-readable rendering.
    pub text: String,
}

/// Errors produced while resolving a resource URI.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The URI referenced an account the ledger does not know.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A known account id followed by an unsupported sub-path.
    #[error("Unknown resource path: {uri}")]
    UnknownPath {
        /// The offending URI.
        uri: String,
    },

    /// The URI matches no known pattern.
    #[error("Unknown resource: {uri}")]
    UnknownResource {
        /// The offending URI.
        uri: String,
    },
}

/// Enumerates every addressable resource: the accounts collection plus
/// detail, balance, and transactions views per account.
#[must_use]
pub fn list_resources(store: &LedgerStore) -> Vec<Resource> {
    let mut resources = vec![Resource {
        uri: ACCOUNTS_URI.to_string(),
        name: "Accounts".to_string(),
        description: Some("List of accounts for the current user".to_string()),
    }];

    for account in store.list_accounts() {
        let id = &account.account_id;
        resources.push(Resource {
            uri: format!("{ACCOUNT_PREFIX}{id}"),
            name: format!("Account {id}"),
            description: Some("Account details".to_string()),
        });
        resources.push(Resource {
            uri: format!("{ACCOUNT_PREFIX}{id}/balance"),
            name: format!("Balance {id}"),
            description: Some("Current account balance".to_string()),
        });
        resources.push(Resource {
            uri: format!("{ACCOUNT_PREFIX}{id}/transactions"),
            name: format!("Transactions {id}"),
            description: Some("Recent transactions".to_string()),
        });
    }

    resources
}

/// Resolves a URI to its textual rendering.
///
/// # Errors
///
/// Returns [`ResourceError::Ledger`] for an unknown account id,
/// [`ResourceError::UnknownPath`] for a recognised id with an unsupported
/// sub-path, and [`ResourceError::UnknownResource`] for anything else.
pub fn read_resource(
    store: &LedgerStore,
    uri: &str,
) -> Result<Vec<ResourceContents>, ResourceError> {
    if uri == ACCOUNTS_URI {
        return Ok(contents(uri, render_account_list(store)));
    }

    if let Some(rest) = uri.strip_prefix(ACCOUNT_PREFIX) {
        let (id, sub_path) = match rest.split_once('/') {
            Some((id, sub)) => (id, Some(sub)),
            None => (rest, None),
        };

        // The account id resolves before the sub-path is examined
        let account = store.get_account(id)?;

        return match sub_path {
            None => Ok(contents(uri, render_account_detail(&account))),
            Some("balance") => {
                let balance = store.get_balance(id)?;
                let mut text = format!("Balance for {id}\n");
                let _ = writeln!(
                    text,
                    "Available: {} {}",
                    balance.available, balance.currency
                );
                let _ = writeln!(text, "Ledger: {} {}", balance.ledger, balance.currency);
                Ok(contents(uri, text))
            }
            Some("transactions") => {
                let transactions = store.list_transactions(id, None, None)?;
                let mut text = format!("Transactions for {id}:\n");
                for t in &transactions {
                    let _ = writeln!(
                        text,
                        "- {} | {} | {} | {} {} | {}",
                        t.transaction_id,
                        t.date,
                        t.description,
                        t.amount,
                        t.currency,
                        kind_label(t.kind)
                    );
                }
                Ok(contents(uri, text))
            }
            Some(_) => Err(ResourceError::UnknownPath {
                uri: uri.to_string(),
            }),
        };
    }

    Err(ResourceError::UnknownResource {
        uri: uri.to_string(),
    })
}

fn contents(uri: &str, text: String) -> Vec<ResourceContents> {
    vec![ResourceContents {
        uri: uri.to_string(),
        text,
    }]
}

fn render_account_list(store: &LedgerStore) -> String {
    let mut text = String::from("Accounts:\n");
    for account in store.list_accounts() {
        let _ = writeln!(
            text,
            "- {} ({}) {} owner={}",
            account.account_id, account.account_type, account.currency, account.owner_name
        );
    }
    text
}

fn render_account_detail(account: &Account) -> String {
    format!(
        "Account {}\nType: {}\nCurrency: {}\nOwner: {}\n",
        account.account_id, account.account_type, account.currency, account.owner_name
    )
}

const fn kind_label(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Debit => "debit",
        TransactionKind::Credit => "credit",
    }
}
