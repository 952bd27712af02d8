//! The ledger snapshot and the commands that mutate it.

use serde::{Deserialize, Serialize};

use crate::{
    common::*,
    transaction::{Transaction, TransactionId},
};

/// Complete serializable state: transactions (newest-inserted first) and the
/// monthly budget.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub monthly_budget: f64,
}

/// Mutations understood by [`Ledger::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    Add(Transaction),
    Delete(TransactionId),
    SetBudget(f64),
    Replace(Ledger),
    Clear,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `command` and reports whether the ledger changed.
    ///
    /// `Add` is ignored when the identifier is already present, and `Delete`
    /// of an unknown identifier is a no-op.
    pub fn apply(&mut self, command: LedgerCommand) -> bool {
        match command {
            LedgerCommand::Add(transaction) => {
                if self.contains(&transaction.id) {
                    return false;
                }
                self.transactions.insert(0, transaction);
                true
            }
            LedgerCommand::Delete(id) => {
                match self.transactions.iter().position(|txn| txn.id() == &id) {
                    Some(index) => {
                        self.transactions.remove(index);
                        true
                    }
                    None => false,
                }
            }
            LedgerCommand::SetBudget(amount) => {
                let changed = self.monthly_budget != amount;
                self.monthly_budget = amount;
                changed
            }
            LedgerCommand::Replace(ledger) => {
                let changed = *self != ledger;
                *self = ledger;
                changed
            }
            LedgerCommand::Clear => {
                let changed = !self.is_empty() || self.monthly_budget != 0.0;
                *self = Ledger::default();
                changed
            }
        }
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id() == id)
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.transaction(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::transaction::NewTransaction;

    fn sample(id: &str, amount: f64) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        NewTransaction::expense(amount, "Food", "Groceries", date).into_transaction(id.into())
    }

    #[test]
    fn add_prepends_newest_first() {
        let mut ledger = Ledger::new();
        assert!(ledger.apply(LedgerCommand::Add(sample("a", 1.0))));
        assert!(ledger.apply(LedgerCommand::Add(sample("b", 2.0))));
        let ids: Vec<_> = ledger.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn add_rejects_duplicate_identifier() {
        let mut ledger = Ledger::new();
        ledger.apply(LedgerCommand::Add(sample("a", 1.0)));
        assert!(!ledger.apply(LedgerCommand::Add(sample("a", 9.0))));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.transactions[0].amount, 1.0);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut ledger = Ledger::new();
        ledger.apply(LedgerCommand::Add(sample("a", 1.0)));
        ledger.apply(LedgerCommand::Add(sample("b", 1.0)));
        assert!(ledger.apply(LedgerCommand::Delete("a".into())));
        assert!(!ledger.apply(LedgerCommand::Delete("a".into())));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains(&"b".into()));
    }

    #[test]
    fn clear_restores_default() {
        let mut ledger = Ledger::new();
        ledger.apply(LedgerCommand::Add(sample("a", 1.0)));
        ledger.apply(LedgerCommand::SetBudget(300.0));
        assert!(ledger.apply(LedgerCommand::Clear));
        assert_eq!(ledger, Ledger::default());
        assert!(!ledger.apply(LedgerCommand::Clear));
    }

    #[test]
    fn persisted_layout_uses_camel_case_budget() {
        let mut ledger = Ledger::new();
        ledger.apply(LedgerCommand::SetBudget(200.0));
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["monthlyBudget"], 200.0);
        assert!(json["transactions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let mut ledger = Ledger::new();
        ledger.apply(LedgerCommand::Add(sample("1712345678901", 50.1)));
        ledger.apply(LedgerCommand::Add(sample("c0ffee", 0.3)));
        ledger.apply(LedgerCommand::SetBudget(1234.56));
        let json = serde_json::to_string_pretty(&ledger).unwrap();
        let parsed: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ledger);
    }
}
