//! The process-wide ledger state holder.
//!
//! [`LedgerStore`] owns every account, balance, and transaction history in
//! the process. All public operations acquire one exclusive, non-reentrant
//! lock for their full duration; reads and writes serialise identically.
//! Under the single-consumer dispatch loop the lock is uncontended, but it
//! keeps a transfer atomic with respect to any concurrent front end.
//!
//! The store is created at startup (usually via [`LedgerStore::seeded`])
//! and injected into the dispatch loop; tests construct isolated instances.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::ledger::error::{LedgerError, LedgerResult};
use crate::ledger::model::{
    Account, Balance, Transaction, TransactionKind, TransferRequest, TransferResponse,
};
use crate::ledger::{now_rfc3339, transfer};

/// In-memory ledger state: accounts, balances, and per-account histories.
///
/// Maps are insertion-ordered so enumeration (account listings, resource
/// listings) is deterministic.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    /// Accounts by identifier.
    pub(crate) accounts: IndexMap<String, Account>,
    /// Balance records by account identifier.
    pub(crate) balances: IndexMap<String, Balance>,
    /// Append-only transaction histories by account identifier.
    pub(crate) transactions: IndexMap<String, Vec<Transaction>>,
}

/// The in-memory holder of accounts, balances, and transaction histories.
pub struct LedgerStore {
    inner: Mutex<LedgerState>,
}

impl LedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LedgerState::default()),
        }
    }

    /// Creates a store with the fixed demo dataset.
    #[must_use]
    pub fn seeded() -> Self {
        let store = Self::new();
        let now = now_rfc3339();

        store.insert_account(
            Account {
                account_id: "CHK-001".to_string(),
                account_type: "Checking".to_string(),
                currency: "USD".to_string(),
                owner_name: "Jane Doe".to_string(),
            },
            Balance {
                account_id: "CHK-001".to_string(),
                available: Decimal::new(125_075, 2),
                ledger: Decimal::new(130_000, 2),
                currency: "USD".to_string(),
            },
        );
        store.insert_account(
            Account {
                account_id: "SAV-001".to_string(),
                account_type: "Savings".to_string(),
                currency: "USD".to_string(),
                owner_name: "Jane Doe".to_string(),
            },
            Balance {
                account_id: "SAV-001".to_string(),
                available: Decimal::new(500_000, 2),
                ledger: Decimal::new(500_000, 2),
                currency: "USD".to_string(),
            },
        );

        store.record_transaction(
            "CHK-001",
            Transaction {
                transaction_id: "tx-1001".to_string(),
                date: now.clone(),
                description: "Coffee shop".to_string(),
                amount: Decimal::new(-450, 2),
                currency: "USD".to_string(),
                kind: TransactionKind::Debit,
            },
        );
        store.record_transaction(
            "CHK-001",
            Transaction {
                transaction_id: "tx-1002".to_string(),
                date: now.clone(),
                description: "Payroll".to_string(),
                amount: Decimal::new(250_000, 2),
                currency: "USD".to_string(),
                kind: TransactionKind::Credit,
            },
        );
        store.record_transaction(
            "SAV-001",
            Transaction {
                transaction_id: "tx-2001".to_string(),
                date: now,
                description: "Initial deposit".to_string(),
                amount: Decimal::new(500_000, 2),
                currency: "USD".to_string(),
                kind: TransactionKind::Credit,
            },
        );

        store
    }

    /// Adds an account with its balance record and an empty history.
    ///
    /// Bootstrap primitive used by [`Self::seeded`] and by tests; the
    /// protocol exposes no account-creation operation.
    pub fn insert_account(&self, account: Account, balance: Balance) {
        let mut state = self.lock();
        let id = account.account_id.clone();
        state.accounts.insert(id.clone(), account);
        state.balances.insert(id.clone(), balance);
        state.transactions.entry(id).or_default();
    }

    /// Appends a transaction to an account's history.
    ///
    /// Bootstrap primitive; transfers append through the transfer engine.
    pub fn record_transaction(&self, account_id: &str, transaction: Transaction) {
        let mut state = self.lock();
        state
            .transactions
            .entry(account_id.to_string())
            .or_default()
            .push(transaction);
    }

    /// Returns all accounts in insertion order.
    #[must_use]
    pub fn list_accounts(&self) -> Vec<Account> {
        let state = self.lock();
        state.accounts.values().cloned().collect()
    }

    /// Returns a single account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if the id is absent.
    pub fn get_account(&self, account_id: &str) -> LedgerResult<Account> {
        let state = self.lock();
        state
            .accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    /// Returns the balance record for an account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if the id is absent.
    pub fn get_balance(&self, account_id: &str) -> LedgerResult<Balance> {
        let state = self.lock();
        state
            .balances
            .get(account_id)
            .cloned()
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    /// Returns an account's transactions, optionally windowed by calendar
    /// date.
    ///
    /// Bounds are inclusive; the upper bound covers the entire `to` day.
    /// Entries whose stored date does not parse as RFC 3339 are skipped
    /// rather than failing the call.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if the id is absent.
    pub fn list_transactions(
        &self,
        account_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LedgerResult<Vec<Transaction>> {
        let state = self.lock();

        if !state.balances.contains_key(account_id) {
            return Err(LedgerError::account_not_found(account_id));
        }

        let history = state
            .transactions
            .get(account_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut out = Vec::with_capacity(history.len());
        for transaction in history {
            let Ok(parsed) = DateTime::parse_from_rfc3339(&transaction.date) else {
                tracing::debug!(
                    transaction_id = %transaction.transaction_id,
                    date = %transaction.date,
                    "Skipping transaction with unparsable stored date"
                );
                continue;
            };
            let date = parsed.date_naive();
            if from.is_some_and(|bound| date < bound) {
                continue;
            }
            if to.is_some_and(|bound| date > bound) {
                continue;
            }
            out.push(transaction.clone());
        }

        Ok(out)
    }

    /// Moves funds between two accounts atomically.
    ///
    /// Validation and mutation happen under one lock acquisition, so no
    /// other operation can observe the transfer half-applied.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] (source first, then
    /// destination), [`LedgerError::CurrencyMismatch`], or
    /// [`LedgerError::InsufficientFunds`]; the state is untouched on every
    /// error path.
    pub fn transfer(&self, request: &TransferRequest) -> LedgerResult<TransferResponse> {
        let mut state = self.lock();
        transfer::execute(&mut state, request)
    }

    /// Acquires the store's exclusive section.
    ///
    /// Validation fully precedes mutation in every operation, so state
    /// behind a poisoned lock is never half-applied and can be reused.
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}
