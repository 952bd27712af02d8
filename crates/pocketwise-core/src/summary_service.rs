//! Derived aggregates over a ledger snapshot. All functions are O(n) in the
//! number of transactions and never mutate the ledger.

use std::collections::HashMap;

use chrono::Datelike;
use pocketwise_domain::{Amounted, Ledger, Transaction, TransactionKind, YearMonth};

/// Income, expenses and their difference over some set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodSummary {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

impl PeriodSummary {
    fn over<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Self {
        let (income, expenses) =
            transactions.fold((0.0, 0.0), |(income, expenses), txn| match txn.kind {
                TransactionKind::Income => (income + txn.amount(), expenses),
                TransactionKind::Expense => (income, expenses + txn.amount()),
            });
        Self {
            income,
            expenses,
            balance: income - expenses,
        }
    }
}

/// One category's total and its share of the kind's total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percent: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn total_by_kind(ledger: &Ledger, kind: TransactionKind) -> f64 {
        ledger
            .transactions
            .iter()
            .filter(|txn| txn.kind == kind)
            .map(Amounted::amount)
            .sum()
    }

    pub fn category_totals(ledger: &Ledger, kind: TransactionKind) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for txn in ledger.transactions.iter().filter(|txn| txn.kind == kind) {
            *totals.entry(txn.category.clone()).or_insert(0.0) += txn.amount;
        }
        totals
    }

    /// Category totals sorted by amount (largest first, ties by name).
    pub fn category_breakdown(ledger: &Ledger, kind: TransactionKind) -> Vec<CategoryShare> {
        let totals = Self::category_totals(ledger, kind);
        let grand_total: f64 = totals.values().sum();
        let mut shares: Vec<CategoryShare> = totals
            .into_iter()
            .map(|(category, amount)| CategoryShare {
                percent: if grand_total > 0.0 {
                    amount / grand_total * 100.0
                } else {
                    0.0
                },
                category,
                amount,
            })
            .collect();
        shares.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        shares
    }

    /// Lazily yields transactions dated in `month` (1-based) of `year`.
    pub fn transactions_in_month(
        ledger: &Ledger,
        month: u32,
        year: i32,
    ) -> impl Iterator<Item = &Transaction> + '_ {
        ledger
            .transactions
            .iter()
            .filter(move |txn| txn.date.month() == month && txn.date.year() == year)
    }

    /// Budget minus total expenses. Negative when overspent; never clamped.
    pub fn remaining_budget(ledger: &Ledger) -> f64 {
        ledger.monthly_budget - Self::total_by_kind(ledger, TransactionKind::Expense)
    }

    pub fn month_summary(ledger: &Ledger, month: YearMonth) -> PeriodSummary {
        PeriodSummary::over(Self::transactions_in_month(
            ledger,
            month.month,
            month.year,
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pocketwise_domain::NewTransaction;

    use super::*;

    fn ledger_with(entries: Vec<NewTransaction>) -> Ledger {
        let mut ledger = Ledger::new();
        for (index, entry) in entries.into_iter().enumerate() {
            ledger
                .transactions
                .push(entry.into_transaction(index.to_string().into()));
        }
        ledger
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn totals_are_zero_for_empty_ledger() {
        let ledger = Ledger::new();
        assert_eq!(
            SummaryService::total_by_kind(&ledger, TransactionKind::Expense),
            0.0
        );
        assert!(SummaryService::category_totals(&ledger, TransactionKind::Income).is_empty());
    }

    #[test]
    fn category_totals_merge_same_label() {
        let ledger = ledger_with(vec![
            NewTransaction::expense(10.0, "Food", "Lunch", day(2026, 1, 1)),
            NewTransaction::expense(15.0, "Food", "Dinner", day(2026, 1, 2)),
            NewTransaction::income(99.0, "Food", "Refund", day(2026, 1, 2)),
        ]);
        let totals = SummaryService::category_totals(&ledger, TransactionKind::Expense);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals["Food"], 25.0);
    }

    #[test]
    fn breakdown_sorts_and_computes_shares() {
        let ledger = ledger_with(vec![
            NewTransaction::expense(25.0, "Transport", "Bus pass", day(2026, 1, 1)),
            NewTransaction::expense(75.0, "Rent", "Room", day(2026, 1, 1)),
        ]);
        let shares = SummaryService::category_breakdown(&ledger, TransactionKind::Expense);
        assert_eq!(shares[0].category, "Rent");
        assert_eq!(shares[0].percent, 75.0);
        assert_eq!(shares[1].percent, 25.0);
    }

    #[test]
    fn month_filter_matches_year_and_month() {
        let ledger = ledger_with(vec![
            NewTransaction::expense(1.0, "A", "jan", day(2026, 1, 31)),
            NewTransaction::expense(2.0, "A", "feb", day(2026, 2, 1)),
            NewTransaction::income(4.0, "B", "feb income", day(2026, 2, 14)),
            NewTransaction::expense(8.0, "A", "last year", day(2025, 2, 1)),
        ]);
        let february: Vec<_> = SummaryService::transactions_in_month(&ledger, 2, 2026)
            .map(|txn| txn.description.as_str())
            .collect();
        assert_eq!(february, ["feb", "feb income"]);
        assert_eq!(
            SummaryService::transactions_in_month(&ledger, 13, 2026).count(),
            0
        );

        let summary = SummaryService::month_summary(&ledger, YearMonth::new(2026, 2).unwrap());
        assert_eq!(summary.income, 4.0);
        assert_eq!(summary.expenses, 2.0);
        assert_eq!(summary.balance, 2.0);
    }

    #[test]
    fn remaining_budget_goes_negative() {
        let mut ledger = ledger_with(vec![NewTransaction::expense(
            250.0,
            "Rent",
            "Room",
            day(2026, 1, 1),
        )]);
        ledger.monthly_budget = 200.0;
        assert_eq!(SummaryService::remaining_budget(&ledger), -50.0);
    }
}
