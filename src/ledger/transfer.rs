//! The transfer engine: the ledger's single write operation.
//!
//! A transfer either completes in full or fails with a specific error.
//! Validation fully precedes mutation, so no rollback path exists: once
//! the balance adjustments start, they run unconditionally to completion.
//! Callers hold the store's exclusive lock for the whole operation.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::error::{LedgerError, LedgerResult};
use crate::ledger::model::{
    Balance, Transaction, TransactionKind, TransferRequest, TransferResponse, TransferStatus,
};
use crate::ledger::now_rfc3339;
use crate::ledger::store::LedgerState;

/// Validates and applies a transfer against ledger state.
///
/// Validation order: source balance exists, destination balance exists,
/// both currencies match the request, source `available` covers the
/// amount. On success both balances move by the amount, and one debit and
/// one credit transaction are appended, sharing a timestamp and the
/// generated transfer id.
pub(crate) fn execute(
    state: &mut LedgerState,
    request: &TransferRequest,
) -> LedgerResult<TransferResponse> {
    let Some(from_balance) = state.balances.get(&request.from_account_id) else {
        return Err(LedgerError::account_not_found(&request.from_account_id));
    };
    let Some(to_balance) = state.balances.get(&request.to_account_id) else {
        return Err(LedgerError::account_not_found(&request.to_account_id));
    };

    if from_balance.currency != request.currency || to_balance.currency != request.currency {
        return Err(LedgerError::CurrencyMismatch);
    }
    if from_balance.available < request.amount {
        return Err(LedgerError::InsufficientFunds);
    }

    // Validation complete; everything below is unconditional.
    let timestamp = now_rfc3339();
    let transfer_id = format!("tr-{}", Uuid::new_v4());

    adjust(&mut state.balances, &request.from_account_id, -request.amount);
    adjust(&mut state.balances, &request.to_account_id, request.amount);

    let description = request
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty());

    state
        .transactions
        .entry(request.from_account_id.clone())
        .or_default()
        .push(Transaction {
            transaction_id: format!("tx-out-{transfer_id}"),
            date: timestamp.clone(),
            description: description.unwrap_or("Transfer out").to_string(),
            amount: -request.amount,
            currency: request.currency.clone(),
            kind: TransactionKind::Debit,
        });
    state
        .transactions
        .entry(request.to_account_id.clone())
        .or_default()
        .push(Transaction {
            transaction_id: format!("tx-in-{transfer_id}"),
            date: timestamp.clone(),
            description: description.unwrap_or("Transfer in").to_string(),
            amount: request.amount,
            currency: request.currency.clone(),
            kind: TransactionKind::Credit,
        });

    tracing::debug!(
        %transfer_id,
        from = %request.from_account_id,
        to = %request.to_account_id,
        amount = %request.amount,
        "Transfer completed"
    );

    Ok(TransferResponse {
        transfer_id,
        status: TransferStatus::Completed,
        timestamp,
    })
}

/// Moves `available` and `ledger` by the same delta.
///
/// No-op for unknown accounts; callers validate existence first.
fn adjust(balances: &mut IndexMap<String, Balance>, account_id: &str, delta: Decimal) {
    if let Some(balance) = balances.get_mut(account_id) {
        balance.available += delta;
        balance.ledger += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::model::Account;
    use rust_decimal_macros::dec;

    fn state_with(accounts: &[(&str, &str, Decimal, Decimal)]) -> LedgerState {
        let mut state = LedgerState::default();
        for (id, currency, available, ledger) in accounts {
            state.accounts.insert(
                (*id).to_string(),
                Account {
                    account_id: (*id).to_string(),
                    account_type: "Checking".to_string(),
                    currency: (*currency).to_string(),
                    owner_name: "Jane Doe".to_string(),
                },
            );
            state.balances.insert(
                (*id).to_string(),
                Balance {
                    account_id: (*id).to_string(),
                    available: *available,
                    ledger: *ledger,
                    currency: (*currency).to_string(),
                },
            );
            state.transactions.insert((*id).to_string(), Vec::new());
        }
        state
    }

    fn request(from: &str, to: &str, amount: Decimal, currency: &str) -> TransferRequest {
        TransferRequest {
            from_account_id: from.to_string(),
            to_account_id: to.to_string(),
            amount,
            currency: currency.to_string(),
            description: None,
        }
    }

    #[test]
    fn successful_transfer_moves_both_fields() {
        let mut state = state_with(&[
            ("A", "USD", dec!(1250.75), dec!(1300.00)),
            ("B", "USD", dec!(5000.00), dec!(5000.00)),
        ]);

        let response = execute(&mut state, &request("A", "B", dec!(100.00), "USD")).unwrap();

        assert_eq!(response.status, TransferStatus::Completed);
        assert!(response.transfer_id.starts_with("tr-"));

        let from = &state.balances["A"];
        assert_eq!(from.available, dec!(1150.75));
        assert_eq!(from.ledger, dec!(1200.00));

        let to = &state.balances["B"];
        assert_eq!(to.available, dec!(5100.00));
        assert_eq!(to.ledger, dec!(5100.00));
    }

    #[test]
    fn transfer_preserves_hold_gap() {
        let mut state = state_with(&[
            ("A", "USD", dec!(1250.75), dec!(1300.00)),
            ("B", "USD", dec!(5000.00), dec!(5000.00)),
        ]);
        let gap_before = state.balances["A"].ledger - state.balances["A"].available;

        execute(&mut state, &request("A", "B", dec!(25.50), "USD")).unwrap();

        let gap_after = state.balances["A"].ledger - state.balances["A"].available;
        assert_eq!(gap_before, gap_after);
    }

    #[test]
    fn transfer_appends_paired_transactions() {
        let mut state = state_with(&[
            ("A", "USD", dec!(200.00), dec!(200.00)),
            ("B", "USD", dec!(0.00), dec!(0.00)),
        ]);

        let response = execute(&mut state, &request("A", "B", dec!(75.00), "USD")).unwrap();

        let debit = &state.transactions["A"][0];
        let credit = &state.transactions["B"][0];

        assert_eq!(debit.transaction_id, format!("tx-out-{}", response.transfer_id));
        assert_eq!(credit.transaction_id, format!("tx-in-{}", response.transfer_id));
        assert_eq!(debit.amount, dec!(-75.00));
        assert_eq!(credit.amount, dec!(75.00));
        assert_eq!(debit.kind, TransactionKind::Debit);
        assert_eq!(credit.kind, TransactionKind::Credit);
        assert_eq!(debit.date, credit.date);
        assert_eq!(debit.date, response.timestamp);
    }

    #[test]
    fn unknown_source_account() {
        let mut state = state_with(&[("B", "USD", dec!(10.00), dec!(10.00))]);

        let err = execute(&mut state, &request("MISSING", "B", dec!(5.00), "USD")).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::AccountNotFound { account_id } if account_id == "MISSING"
        ));
    }

    #[test]
    fn unknown_destination_account() {
        let mut state = state_with(&[("A", "USD", dec!(10.00), dec!(10.00))]);

        let err = execute(&mut state, &request("A", "MISSING", dec!(5.00), "USD")).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::AccountNotFound { account_id } if account_id == "MISSING"
        ));
        assert_eq!(state.balances["A"].available, dec!(10.00));
    }

    #[test]
    fn currency_mismatch_leaves_state_untouched() {
        let mut state = state_with(&[
            ("A", "USD", dec!(100.00), dec!(100.00)),
            ("B", "EUR", dec!(100.00), dec!(100.00)),
        ]);

        let err = execute(&mut state, &request("A", "B", dec!(10.00), "USD")).unwrap_err();
        assert!(matches!(err, LedgerError::CurrencyMismatch));
        assert_eq!(state.balances["A"].available, dec!(100.00));
        assert_eq!(state.balances["B"].available, dec!(100.00));
        assert!(state.transactions["A"].is_empty());
    }

    #[test]
    fn insufficient_funds_leaves_state_untouched() {
        let mut state = state_with(&[
            ("A", "USD", dec!(50.00), dec!(50.00)),
            ("B", "USD", dec!(0.00), dec!(0.00)),
        ]);

        let err = execute(&mut state, &request("A", "B", dec!(50.01), "USD")).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds));
        assert_eq!(state.balances["A"].available, dec!(50.00));
        assert!(state.transactions["A"].is_empty());
        assert!(state.transactions["B"].is_empty());
    }

    #[test]
    fn exact_available_amount_is_sufficient() {
        let mut state = state_with(&[
            ("A", "USD", dec!(50.00), dec!(50.00)),
            ("B", "USD", dec!(0.00), dec!(0.00)),
        ]);

        execute(&mut state, &request("A", "B", dec!(50.00), "USD")).unwrap();
        assert_eq!(state.balances["A"].available, dec!(0.00));
        assert_eq!(state.balances["B"].available, dec!(50.00));
    }

    #[test]
    fn blank_description_falls_back_to_defaults() {
        let mut state = state_with(&[
            ("A", "USD", dec!(100.00), dec!(100.00)),
            ("B", "USD", dec!(0.00), dec!(0.00)),
        ]);
        let mut req = request("A", "B", dec!(10.00), "USD");
        req.description = Some("   ".to_string());

        execute(&mut state, &req).unwrap();

        assert_eq!(state.transactions["A"][0].description, "Transfer out");
        assert_eq!(state.transactions["B"][0].description, "Transfer in");
    }

    #[test]
    fn custom_description_applies_to_both_sides() {
        let mut state = state_with(&[
            ("A", "USD", dec!(100.00), dec!(100.00)),
            ("B", "USD", dec!(0.00), dec!(0.00)),
        ]);
        let mut req = request("A", "B", dec!(10.00), "USD");
        req.description = Some("Rent".to_string());

        execute(&mut state, &req).unwrap();

        assert_eq!(state.transactions["A"][0].description, "Rent");
        assert_eq!(state.transactions["B"][0].description, "Rent");
    }

    #[test]
    fn self_transfer_nets_to_zero() {
        let mut state = state_with(&[("A", "USD", dec!(100.00), dec!(100.00))]);

        execute(&mut state, &request("A", "A", dec!(40.00), "USD")).unwrap();

        assert_eq!(state.balances["A"].available, dec!(100.00));
        assert_eq!(state.balances["A"].ledger, dec!(100.00));
        assert_eq!(state.transactions["A"].len(), 2);
    }

    #[test]
    fn transfer_ids_are_unique_per_call() {
        let mut state = state_with(&[
            ("A", "USD", dec!(100.00), dec!(100.00)),
            ("B", "USD", dec!(0.00), dec!(0.00)),
        ]);

        let first = execute(&mut state, &request("A", "B", dec!(1.00), "USD")).unwrap();
        let second = execute(&mut state, &request("A", "B", dec!(1.00), "USD")).unwrap();
        assert_ne!(first.transfer_id, second.transfer_id);
    }
}
