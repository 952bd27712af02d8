use chrono::NaiveDate;
use pocketwise_domain::{NewTransaction, Transaction, TransactionId, TransactionKind};

use crate::CoreError;

/// Validation and construction rules for ledger entries.
pub struct TransactionService;

impl TransactionService {
    /// Checks user input against the entry rules. `today` bounds the date.
    pub fn validate(input: &NewTransaction, today: NaiveDate) -> Result<(), CoreError> {
        if !input.amount.is_finite() || input.amount <= 0.0 {
            return Err(CoreError::Validation(format!(
                "amount must be greater than zero (got {})",
                input.amount
            )));
        }
        if input.category.trim().is_empty() {
            return Err(CoreError::Validation("category must not be empty".into()));
        }
        if input.description.trim().is_empty() {
            return Err(CoreError::Validation(
                "description must not be empty".into(),
            ));
        }
        if input.date > today {
            return Err(CoreError::Validation(format!(
                "date {} is in the future",
                input.date
            )));
        }
        Ok(())
    }

    /// Validates `input`, trims its text fields and assigns a fresh identifier.
    pub fn create(input: NewTransaction, today: NaiveDate) -> Result<Transaction, CoreError> {
        Self::validate(&input, today)?;
        let normalized = NewTransaction {
            category: input.category.trim().to_string(),
            description: input.description.trim().to_string(),
            ..input
        };
        Ok(normalized.into_transaction(TransactionId::generate()))
    }

    /// Transactions of `kind` (or all when `None`), newest date first.
    ///
    /// The sort is stable, so entries sharing a date keep ledger order.
    pub fn sorted_by_date<'a>(
        transactions: &'a [Transaction],
        kind: Option<TransactionKind>,
    ) -> Vec<&'a Transaction> {
        let mut rows: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| kind.map_or(true, |k| txn.kind == k))
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }
}
