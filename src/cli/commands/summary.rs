use pocketwise_core::BudgetStatus;
use pocketwise_domain::{TransactionKind, YearMonth};

use super::{parse_amount, parse_kind, CommandDefinition};
use crate::cli::context::ShellContext;
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "budget",
            "Show budget progress, or set the monthly budget",
            "budget [amount]",
            cmd_budget,
        ),
        CommandDefinition::new(
            "summary",
            "Show totals, balance and remaining budget",
            "summary",
            cmd_summary,
        ),
        CommandDefinition::new(
            "month",
            "Show income and expenses for one month",
            "month [MM YYYY | YYYY-MM]",
            cmd_month,
        ),
        CommandDefinition::new(
            "categories",
            "Show totals per category",
            "categories [expense|income]",
            cmd_categories,
        ),
    ]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        let amount = parse_amount(raw)?;
        context.store.set_budget(amount)?;
        output::success(format!(
            "Monthly budget set to {}.",
            context.format_amount(amount)
        ));
        return Ok(());
    }

    let progress = context.store.budget_progress();
    if progress.budget <= 0.0 {
        output::info("No monthly budget set. Use `budget <amount>` to set one.");
        return Ok(());
    }

    output::section("Monthly budget");
    output::plain(format!("  Budget    : {}", context.format_amount(progress.budget)));
    output::plain(format!("  Spent     : {}", context.format_amount(progress.spent)));
    output::plain(format!(
        "  Remaining : {}",
        context.format_amount(progress.remaining)
    ));
    let usage = format!("  Used      : {:.1}% ({})", progress.percent, progress.status);
    match progress.status {
        BudgetStatus::OnTrack => output::plain(usage),
        BudgetStatus::Caution | BudgetStatus::Critical => output::warning(usage.trim_start()),
    }
    warn_if_over_budget(context);
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = &context.store;
    output::section("Summary");
    output::plain(format!(
        "  Total Income     : {}",
        context.format_amount(store.total_income())
    ));
    output::plain(format!(
        "  Total Expenses   : {}",
        context.format_amount(store.total_expenses())
    ));
    output::plain(format!(
        "  Balance          : {}",
        context.format_amount(store.balance())
    ));
    if store.monthly_budget() > 0.0 {
        output::plain(format!(
            "  Monthly Budget   : {}",
            context.format_amount(store.monthly_budget())
        ));
        output::plain(format!(
            "  Remaining Budget : {}",
            context.format_amount(store.remaining_budget())
        ));
    }
    output::plain(format!("  Transactions     : {}", store.len()));
    warn_if_over_budget(context);
    Ok(())
}

fn warn_if_over_budget(context: &ShellContext) {
    if context.store.monthly_budget() > 0.0 && context.store.is_over_budget() {
        output::warning(format!(
            "You have exceeded your monthly budget by {}.",
            context.format_amount(-context.store.remaining_budget())
        ));
    }
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = match args {
        [] => YearMonth::of(context.store.today()),
        _ => parse_month(args)?,
    };
    let summary = context.store.month_summary(month);
    let count = context
        .store
        .transactions_in_month(month.month, month.year)
        .count();

    output::section(month);
    output::plain(format!("  Income       : {}", context.format_amount(summary.income)));
    output::plain(format!(
        "  Expenses     : {}",
        context.format_amount(summary.expenses)
    ));
    output::plain(format!(
        "  Balance      : {}",
        context.format_amount(summary.balance)
    ));
    output::plain(format!("  Transactions : {count}"));
    Ok(())
}

/// Accepts `MM YYYY` or `YYYY-MM`; months are 1-based.
pub(crate) fn parse_month(args: &[&str]) -> Result<YearMonth, CommandError> {
    let invalid = || CommandError::InvalidArguments(format!("invalid month `{}`", args.join(" ")));
    match args {
        [iso] => iso
            .parse::<YearMonth>()
            .map_err(|err| CommandError::InvalidArguments(err.to_string())),
        [month, year] => {
            let month: u32 = month.trim().parse().map_err(|_| invalid())?;
            let year: i32 = year.trim().parse().map_err(|_| invalid())?;
            YearMonth::new(year, month).ok_or_else(invalid)
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: month [MM YYYY | YYYY-MM]".into(),
        )),
    }
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = parse_kind(args.first())?.unwrap_or(TransactionKind::Expense);
    let shares = context.store.category_breakdown(kind);
    if shares.is_empty() {
        output::info(format!("No {} recorded.", kind.as_str()));
        return Ok(());
    }

    output::section(format!("{kind} by category"));
    for share in &shares {
        output::plain(format!(
            "  {:<16} {:>12} {:>6.1}%",
            share.category,
            context.format_amount(share.amount),
            share.percent
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_accepts_both_layouts() {
        let march = YearMonth::new(2026, 3).unwrap();
        assert_eq!(parse_month(&["03", "2026"]).unwrap(), march);
        assert_eq!(parse_month(&["2026-03"]).unwrap(), march);
    }

    #[test]
    fn month_rejects_out_of_range_values() {
        assert!(parse_month(&["13", "2026"]).is_err());
        assert!(parse_month(&["0", "2026"]).is_err());
        assert!(parse_month(&["march"]).is_err());
        assert!(parse_month(&["1", "2", "3"]).is_err());
    }
}
