//! Finance report layout.
//!
//! [`ReportGenerator::generate`] turns a read-only [`ReportSnapshot`] into a
//! [`ReportDocument`]: A4 pages holding positioned text runs and rules, with
//! coordinates in millimetres measured from the top-left corner. The
//! document can then be serialized with [`pdf::render`] or previewed with
//! [`ReportDocument::to_text`].

pub mod pdf;
mod text;

use chrono::NaiveDate;
use pocketwise_domain::{Ledger, Transaction, TransactionKind};

use crate::{
    format::{CurrencyFormatter, DateFormatter, PatternDateFormatter, SymbolFormatter},
    summary_service::SummaryService,
    transaction_service::TransactionService,
};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const REPORT_TITLE: &str = "PocketWise Finance Report";
/// Maximum number of transactions listed in the history table.
pub const MAX_TABLE_ROWS: usize = 20;

const MARGIN_LEFT: f64 = 20.0;
const MARGIN_RIGHT: f64 = 190.0;
const COL_CATEGORY: f64 = 60.0;
const COL_DESCRIPTION: f64 = 100.0;
const COL_AMOUNT: f64 = 170.0;
const FIRST_ROW_Y: f64 = 110.0;
const ROW_STEP: f64 = 10.0;
/// A row placed below this line starts a new page.
const ROW_LIMIT_Y: f64 = 270.0;
const PAGE_TOP_Y: f64 = 20.0;
const FOOTER_Y: f64 = 280.0;
const DESCRIPTION_LIMIT: usize = 30;
const DESCRIPTION_KEEP: usize = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const TITLE: Rgb = Rgb(64, 64, 175);
    pub const MUTED: Rgb = Rgb(100, 100, 100);
    pub const EXPENSE: Rgb = Rgb(220, 53, 69);
    pub const INCOME: Rgb = Rgb(25, 135, 84);
    pub const HEADER_RULE: Rgb = Rgb(200, 200, 200);
    pub const ROW_RULE: Rgb = Rgb(240, 240, 240);
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Rgb,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextRun),
    Rule(Rule),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text(run) => Some(run),
            Element::Rule(_) => None,
        })
    }

    /// True when some text run on the page equals `needle`.
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|run| run.text == needle)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(Page::texts)
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|run| run.text == needle)
    }
}

/// Read-only input to the report: the ledger contents plus the totals the
/// caller already computed and the date printed in the footer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSnapshot {
    pub transactions: Vec<Transaction>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub monthly_budget: f64,
    pub generated_on: NaiveDate,
}

impl ReportSnapshot {
    pub fn from_ledger(ledger: &Ledger, generated_on: NaiveDate) -> Self {
        Self {
            transactions: ledger.transactions.clone(),
            total_income: SummaryService::total_by_kind(ledger, TransactionKind::Income),
            total_expenses: SummaryService::total_by_kind(ledger, TransactionKind::Expense),
            monthly_budget: ledger.monthly_budget,
            generated_on,
        }
    }

    pub fn balance(&self) -> f64 {
        self.total_income - self.total_expenses
    }

    pub fn remaining_budget(&self) -> f64 {
        self.monthly_budget - self.total_expenses
    }
}

/// Builds report documents using the supplied formatters.
pub struct ReportGenerator {
    currency: Box<dyn CurrencyFormatter>,
    dates: Box<dyn DateFormatter>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(
            Box::new(SymbolFormatter::default()),
            Box::new(PatternDateFormatter::for_locale("en-US")),
        )
    }
}

impl ReportGenerator {
    pub fn new(currency: Box<dyn CurrencyFormatter>, dates: Box<dyn DateFormatter>) -> Self {
        Self { currency, dates }
    }

    pub fn generate(&self, snapshot: &ReportSnapshot) -> ReportDocument {
        let mut layout = Layout::new();

        layout.text(MARGIN_LEFT, 20.0, 22.0, Rgb::TITLE, REPORT_TITLE);
        layout.text(MARGIN_LEFT, 35.0, 16.0, Rgb::BLACK, "Financial Summary");

        let money = |amount: f64| self.currency.format_amount(amount);
        let mut summary = vec![
            format!("Total Income: {}", money(snapshot.total_income)),
            format!("Total Expenses: {}", money(snapshot.total_expenses)),
            format!("Balance: {}", money(snapshot.balance())),
        ];
        if snapshot.monthly_budget > 0.0 {
            summary.push(format!("Monthly Budget: {}", money(snapshot.monthly_budget)));
            summary.push(format!(
                "Remaining Budget: {}",
                money(snapshot.remaining_budget())
            ));
        }
        for (index, line) in summary.into_iter().enumerate() {
            layout.text(MARGIN_LEFT, 45.0 + 7.0 * index as f64, 12.0, Rgb::BLACK, line);
        }

        if !snapshot.transactions.is_empty() {
            self.history_table(&mut layout, &snapshot.transactions);
        }

        layout.text(
            MARGIN_LEFT,
            FOOTER_Y,
            10.0,
            Rgb::MUTED,
            format!(
                "Generated on {} with PocketWise",
                self.dates.format_date(snapshot.generated_on)
            ),
        );

        layout.finish()
    }

    fn history_table(&self, layout: &mut Layout, transactions: &[Transaction]) {
        layout.text(MARGIN_LEFT, 90.0, 16.0, Rgb::BLACK, "Transaction History");
        for (x, label) in [
            (MARGIN_LEFT, "Date"),
            (COL_CATEGORY, "Category"),
            (COL_DESCRIPTION, "Description"),
            (COL_AMOUNT, "Amount"),
        ] {
            layout.text(x, 100.0, 11.0, Rgb::MUTED, label);
        }
        layout.rule(102.0, Rgb::HEADER_RULE);

        let rows = recent_transactions(transactions);
        let mut y = FIRST_ROW_Y;
        for (index, txn) in rows.iter().enumerate() {
            if y > ROW_LIMIT_Y {
                layout.new_page();
                y = PAGE_TOP_Y;
            }
            layout.text(
                MARGIN_LEFT,
                y,
                11.0,
                Rgb::BLACK,
                self.dates.format_date(txn.date),
            );
            layout.text(COL_CATEGORY, y, 11.0, Rgb::BLACK, txn.category.clone());
            layout.text(
                COL_DESCRIPTION,
                y,
                11.0,
                Rgb::BLACK,
                truncate_description(&txn.description),
            );
            let color = match txn.kind {
                TransactionKind::Expense => Rgb::EXPENSE,
                TransactionKind::Income => Rgb::INCOME,
            };
            layout.text(
                COL_AMOUNT,
                y,
                11.0,
                color,
                self.currency.format_signed(txn.amount, txn.is_expense()),
            );
            if index + 1 < rows.len() {
                layout.rule(y + 2.0, Rgb::ROW_RULE);
            }
            y += ROW_STEP;
        }
    }
}

/// Up to [`MAX_TABLE_ROWS`] transactions, newest date first.
pub fn recent_transactions(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut rows = TransactionService::sorted_by_date(transactions, None);
    rows.truncate(MAX_TABLE_ROWS);
    rows
}

/// Shortens descriptions longer than 30 characters to 27 characters plus `...`.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_LIMIT {
        let kept: String = description.chars().take(DESCRIPTION_KEEP).collect();
        format!("{kept}...")
    } else {
        description.to_string()
    }
}

struct Layout {
    pages: Vec<Page>,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
        }
    }

    fn current(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn text(&mut self, x: f64, y: f64, size: f64, color: Rgb, text: impl Into<String>) {
        self.current().elements.push(Element::Text(TextRun {
            x,
            y,
            size,
            color,
            text: text.into(),
        }));
    }

    fn rule(&mut self, y: f64, color: Rgb) {
        self.current().elements.push(Element::Rule(Rule {
            x1: MARGIN_LEFT,
            y1: y,
            x2: MARGIN_RIGHT,
            y2: y,
            color,
        }));
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
    }

    fn finish(self) -> ReportDocument {
        ReportDocument {
            title: REPORT_TITLE.to_string(),
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use pocketwise_domain::NewTransaction;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn snapshot(transactions: Vec<Transaction>, budget: f64) -> ReportSnapshot {
        let ledger = Ledger {
            transactions,
            monthly_budget: budget,
        };
        ReportSnapshot::from_ledger(&ledger, day(31))
    }

    fn expenses(count: u32) -> Vec<Transaction> {
        (1..=count)
            .map(|d| {
                NewTransaction::expense(d as f64, "Food", format!("Meal {d}"), day(d))
                    .into_transaction(d.to_string().into())
            })
            .collect()
    }

    #[test]
    fn summary_includes_budget_lines_only_when_set() {
        let generator = ReportGenerator::default();
        let without = generator.generate(&snapshot(expenses(1), 0.0));
        assert!(without.has_text("Total Expenses: $1.00"));
        assert!(!without.texts().any(|run| run.text.starts_with("Monthly Budget")));
        assert!(!without.texts().any(|run| run.text.starts_with("Remaining Budget")));

        let with = generator.generate(&snapshot(expenses(1), 200.0));
        assert!(with.has_text("Monthly Budget: $200.00"));
        assert!(with.has_text("Remaining Budget: $199.00"));
    }

    #[test]
    fn empty_ledger_has_no_history_table() {
        let doc = ReportGenerator::default().generate(&snapshot(Vec::new(), 0.0));
        assert_eq!(doc.page_count(), 1);
        assert!(!doc.has_text("Transaction History"));
        assert!(doc.has_text("Generated on 1/31/2026 with PocketWise"));
    }

    #[test]
    fn table_lists_twenty_most_recent_across_two_pages() {
        let doc = ReportGenerator::default().generate(&snapshot(expenses(25), 0.0));
        assert_eq!(doc.page_count(), 2);

        let amounts: Vec<&str> = doc
            .texts()
            .filter(|run| run.x == COL_AMOUNT && run.text.starts_with('-'))
            .map(|run| run.text.as_str())
            .collect();
        assert_eq!(amounts.len(), MAX_TABLE_ROWS);
        assert_eq!(amounts[0], "-$25.00");
        assert_eq!(amounts[19], "-$6.00");

        // Rows at 110..=270 fit the first page; the rest continue from the top.
        let second = &doc.pages[1];
        let first_row = second.texts().next().unwrap();
        assert_eq!(first_row.y, PAGE_TOP_Y);
        assert_eq!(second.texts().filter(|run| run.x == COL_AMOUNT).count(), 3);
        assert!(second.has_text("Generated on 1/31/2026 with PocketWise"));
        assert!(!doc.pages[0].texts().any(|run| run.y == FOOTER_Y));
    }

    #[test]
    fn income_rows_are_positive_and_green() {
        let income = NewTransaction::income(1000.0, "Salary", "Pay", day(3))
            .into_transaction("pay".into());
        let doc = ReportGenerator::default().generate(&snapshot(vec![income], 0.0));
        let amount = doc.texts().find(|run| run.text == "+$1000.00").unwrap();
        assert_eq!(amount.color, Rgb::INCOME);
    }

    #[test]
    fn long_descriptions_are_truncated() {
        assert_eq!(truncate_description("short"), "short");
        let exactly_thirty = "a".repeat(30);
        assert_eq!(truncate_description(&exactly_thirty), exactly_thirty);
        let long = "Monthly subscription to the streaming service";
        assert_eq!(truncate_description(long), "Monthly subscription to the...");
        assert_eq!(truncate_description(long).chars().count(), 30);
    }

    #[test]
    fn generation_is_deterministic() {
        let generator = ReportGenerator::default();
        let input = snapshot(expenses(12), 50.0);
        assert_eq!(generator.generate(&input), generator.generate(&input));
    }

    #[test]
    fn row_separators_skip_last_row() {
        let doc = ReportGenerator::default().generate(&snapshot(expenses(3), 0.0));
        let row_rules = doc.pages[0]
            .elements
            .iter()
            .filter(|element| matches!(element, Element::Rule(rule) if rule.color == Rgb::ROW_RULE))
            .count();
        assert_eq!(row_rules, 2);
    }
}
