use std::fmt;

use pocketwise_domain::{Ledger, TransactionKind};

use crate::{summary_service::SummaryService, CoreError};

const CAUTION_PERCENT: f64 = 75.0;
const CRITICAL_PERCENT: f64 = 90.0;

/// Spending level relative to the monthly budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    OnTrack,
    Caution,
    Critical,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::OnTrack => "On track",
            BudgetStatus::Caution => "Caution",
            BudgetStatus::Critical => "Critical",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetProgress {
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    /// Share of the budget spent, capped at 100. Zero when no budget is set.
    pub percent: f64,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    pub fn is_over_budget(&self) -> bool {
        self.remaining < 0.0
    }
}

pub struct BudgetService;

impl BudgetService {
    pub fn validate(amount: f64) -> Result<(), CoreError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::Validation(format!(
                "budget must be zero or positive (got {amount})"
            )));
        }
        Ok(())
    }

    pub fn progress(ledger: &Ledger) -> BudgetProgress {
        let budget = ledger.monthly_budget;
        let spent = SummaryService::total_by_kind(ledger, TransactionKind::Expense);
        let percent = if budget > 0.0 {
            (spent / budget * 100.0).min(100.0)
        } else {
            0.0
        };
        BudgetProgress {
            budget,
            spent,
            remaining: budget - spent,
            percent,
            status: Self::status_for(percent),
        }
    }

    pub fn status_for(percent: f64) -> BudgetStatus {
        if percent >= CRITICAL_PERCENT {
            BudgetStatus::Critical
        } else if percent >= CAUTION_PERCENT {
            BudgetStatus::Caution
        } else {
            BudgetStatus::OnTrack
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pocketwise_domain::NewTransaction;

    use super::*;

    fn ledger_spending(spent: f64, budget: f64) -> Ledger {
        let date = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let mut ledger = Ledger::new();
        ledger
            .transactions
            .push(NewTransaction::expense(spent, "Bills", "Power", date).into_transaction("x".into()));
        ledger.monthly_budget = budget;
        ledger
    }

    #[test]
    fn rejects_negative_budget() {
        assert!(BudgetService::validate(-0.01).is_err());
        assert!(BudgetService::validate(f64::NAN).is_err());
        assert!(BudgetService::validate(0.0).is_ok());
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(BudgetService::status_for(74.9), BudgetStatus::OnTrack);
        assert_eq!(BudgetService::status_for(75.0), BudgetStatus::Caution);
        assert_eq!(BudgetService::status_for(89.99), BudgetStatus::Caution);
        assert_eq!(BudgetService::status_for(90.0), BudgetStatus::Critical);
    }

    #[test]
    fn progress_caps_percent_but_not_remaining() {
        let progress = BudgetService::progress(&ledger_spending(300.0, 200.0));
        assert_eq!(progress.percent, 100.0);
        assert_eq!(progress.remaining, -100.0);
        assert!(progress.is_over_budget());
        assert_eq!(progress.status, BudgetStatus::Critical);
    }

    #[test]
    fn progress_without_budget_is_zero_percent() {
        let progress = BudgetService::progress(&ledger_spending(50.0, 0.0));
        assert_eq!(progress.percent, 0.0);
        assert_eq!(progress.status, BudgetStatus::OnTrack);
        assert_eq!(progress.remaining, -50.0);
    }
}
