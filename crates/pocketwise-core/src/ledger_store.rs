//! The ledger store: in-memory state, write-through persistence, aggregates.

use std::{collections::HashMap, sync::Arc};

use pocketwise_domain::{
    Displayable, Ledger, LedgerCommand, NewTransaction, Transaction, TransactionId,
    TransactionKind, YearMonth,
};

use crate::{
    budget_service::{BudgetProgress, BudgetService},
    report::ReportSnapshot,
    storage::{repair_snapshot, LedgerStorage},
    summary_service::{CategoryShare, PeriodSummary, SummaryService},
    time::Clock,
    transaction_service::TransactionService,
    CoreError,
};

/// Outcome of reading the persisted snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Repairs applied to the stored snapshot.
    pub warnings: Vec<String>,
    /// Set when the snapshot could not be read and the empty ledger was used.
    pub recovered_from: Option<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.recovered_from.is_none()
    }
}

/// Owns the ledger for a session and writes every mutation through to storage.
pub struct LedgerStore {
    ledger: Ledger,
    storage: Box<dyn LedgerStorage>,
    clock: Arc<dyn Clock>,
}

impl LedgerStore {
    /// Creates a store and hydrates it from `storage`.
    pub fn open(storage: Box<dyn LedgerStorage>, clock: Arc<dyn Clock>) -> (Self, LoadReport) {
        let mut store = Self {
            ledger: Ledger::default(),
            storage,
            clock,
        };
        let report = store.load();
        (store, report)
    }

    /// Replaces the in-memory ledger with the persisted snapshot.
    ///
    /// A missing snapshot yields the empty ledger. Read or parse failures are
    /// logged and treated the same way.
    pub fn load(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        let loaded = match self.storage.load_ledger() {
            Ok(Some(ledger)) => {
                let (ledger, warnings) = repair_snapshot(ledger);
                for warning in &warnings {
                    tracing::warn!(%warning, "repaired stored ledger");
                }
                report.warnings = warnings;
                ledger
            }
            Ok(None) => {
                tracing::debug!("no stored ledger; starting empty");
                Ledger::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored ledger unreadable; starting empty");
                report.recovered_from = Some(err.to_string());
                Ledger::default()
            }
        };
        self.ledger.apply(LedgerCommand::Replace(loaded));
        tracing::debug!(
            transactions = self.ledger.len(),
            budget = self.ledger.monthly_budget,
            "ledger loaded"
        );
        report
    }

    /// Validates `input`, assigns an identifier, prepends it and persists.
    pub fn add(&mut self, input: NewTransaction) -> Result<TransactionId, CoreError> {
        let transaction = TransactionService::create(input, self.clock.today())?;
        let id = transaction.id.clone();
        let label = transaction.display_label();
        self.commit(LedgerCommand::Add(transaction))?;
        tracing::debug!(%id, %label, "transaction added");
        Ok(id)
    }

    /// Removes the transaction with `id`. Returns `false` when none matched.
    pub fn delete(&mut self, id: &TransactionId) -> Result<bool, CoreError> {
        let removed = self.commit(LedgerCommand::Delete(id.clone()))?;
        tracing::debug!(%id, removed, "transaction delete");
        Ok(removed)
    }

    pub fn set_budget(&mut self, amount: f64) -> Result<(), CoreError> {
        BudgetService::validate(amount)?;
        self.commit(LedgerCommand::SetBudget(amount))?;
        tracing::debug!(amount, "monthly budget set");
        Ok(())
    }

    /// Removes the persisted snapshot and resets to the empty ledger.
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.storage.clear_ledger()?;
        self.ledger.apply(LedgerCommand::Clear);
        tracing::info!("ledger cleared");
        Ok(())
    }

    /// Applies `command` to a copy, persists the copy, then adopts it.
    /// The snapshot is written even when the command changed nothing.
    fn commit(&mut self, command: LedgerCommand) -> Result<bool, CoreError> {
        let mut next = self.ledger.clone();
        let changed = next.apply(command);
        self.storage.save_ledger(&next)?;
        self.ledger = next;
        Ok(changed)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> Ledger {
        self.ledger.clone()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    pub fn find(&self, id: &TransactionId) -> Option<&Transaction> {
        self.ledger.transaction(id)
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn monthly_budget(&self) -> f64 {
        self.ledger.monthly_budget
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    pub fn total_by_kind(&self, kind: TransactionKind) -> f64 {
        SummaryService::total_by_kind(&self.ledger, kind)
    }

    pub fn total_expenses(&self) -> f64 {
        self.total_by_kind(TransactionKind::Expense)
    }

    pub fn total_income(&self) -> f64 {
        self.total_by_kind(TransactionKind::Income)
    }

    pub fn balance(&self) -> f64 {
        self.total_income() - self.total_expenses()
    }

    pub fn category_totals(&self, kind: TransactionKind) -> HashMap<String, f64> {
        SummaryService::category_totals(&self.ledger, kind)
    }

    pub fn category_breakdown(&self, kind: TransactionKind) -> Vec<CategoryShare> {
        SummaryService::category_breakdown(&self.ledger, kind)
    }

    /// Lazily yields transactions in `month` (1-based) of `year`.
    pub fn transactions_in_month(
        &self,
        month: u32,
        year: i32,
    ) -> impl Iterator<Item = &Transaction> + '_ {
        SummaryService::transactions_in_month(&self.ledger, month, year)
    }

    pub fn month_summary(&self, month: YearMonth) -> PeriodSummary {
        SummaryService::month_summary(&self.ledger, month)
    }

    /// Budget minus expenses. Negative values signal overspending.
    pub fn remaining_budget(&self) -> f64 {
        SummaryService::remaining_budget(&self.ledger)
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining_budget() < 0.0
    }

    pub fn budget_progress(&self) -> BudgetProgress {
        BudgetService::progress(&self.ledger)
    }

    /// Transactions of `kind` (all when `None`), newest date first.
    pub fn transactions_by_kind(&self, kind: Option<TransactionKind>) -> Vec<&Transaction> {
        TransactionService::sorted_by_date(&self.ledger.transactions, kind)
    }

    /// Read-only input for the report generator, dated today.
    pub fn report_snapshot(&self) -> ReportSnapshot {
        ReportSnapshot::from_ledger(&self.ledger, self.clock.today())
    }
}
