use pocketwise_core::report::truncate_description;
use pocketwise_domain::{NewTransaction, TransactionId, TransactionKind};

use super::{parse_amount, parse_date, parse_kind, CommandDefinition};
use crate::cli::context::{CliMode, ShellContext};
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::io as cli_io;
use crate::cli::output;

const SHORT_ID_LEN: usize = 8;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add-expense",
            "Record money spent",
            "add-expense <amount> <category> <description> [YYYY-MM-DD]",
            cmd_add_expense,
        ),
        CommandDefinition::new(
            "add-income",
            "Record money received",
            "add-income <amount> <category> <description> [YYYY-MM-DD]",
            cmd_add_income,
        ),
        CommandDefinition::new(
            "delete",
            "Delete a transaction by id or id prefix",
            "delete <id>",
            cmd_delete,
        ),
        CommandDefinition::new(
            "list",
            "List transactions, newest first",
            "list [expense|income]",
            cmd_list,
        ),
    ]
}

fn cmd_add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    add_transaction(context, TransactionKind::Expense, args)
}

fn cmd_add_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    add_transaction(context, TransactionKind::Income, args)
}

fn add_transaction(context: &mut ShellContext, kind: TransactionKind, args: &[&str]) -> CommandResult {
    let input = if args.is_empty() && context.mode() == CliMode::Interactive {
        prompt_transaction(context, kind)?
    } else {
        parse_transaction(context, kind, args)?
    };
    let amount = context.format_amount(input.amount);
    let id = context.store.add(input)?;
    output::success(format!(
        "{kind} of {amount} recorded ({}).",
        short_id(&id)
    ));
    Ok(())
}

fn parse_transaction(
    context: &ShellContext,
    kind: TransactionKind,
    args: &[&str],
) -> Result<NewTransaction, CommandError> {
    let [amount, category, description, rest @ ..] = args else {
        return Err(CommandError::InvalidArguments(format!(
            "usage: add-{} <amount> <category> <description> [YYYY-MM-DD]",
            kind.as_str()
        )));
    };
    let date = match rest {
        [] => context.store.today(),
        [date] => parse_date(date)?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "too many arguments; quote descriptions that contain spaces".into(),
            ))
        }
    };

    Ok(NewTransaction {
        amount: parse_amount(amount)?,
        category: category.to_string(),
        description: description.to_string(),
        date,
        kind,
    })
}

fn prompt_transaction(
    context: &ShellContext,
    kind: TransactionKind,
) -> Result<NewTransaction, CommandError> {
    let theme = context.theme();
    output::section(format!("New {}", kind.as_str()));
    let amount = parse_amount(&cli_io::prompt_text(theme, "Amount")?)?;
    let category = cli_io::prompt_text(theme, "Category")?;
    let description = cli_io::prompt_text(theme, "Description")?;
    let today = context.store.today().format("%Y-%m-%d").to_string();
    let date = parse_date(&cli_io::prompt_with_default(theme, "Date", today)?)?;

    Ok(NewTransaction {
        amount,
        category,
        description,
        date,
        kind,
    })
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(needle) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: delete <id>".into()));
    };
    let id = resolve_id(context, needle)?;
    if context.store.delete(&id)? {
        output::success(format!("Transaction {} deleted.", short_id(&id)));
    } else {
        output::info("Nothing to delete.");
    }
    Ok(())
}

/// Exact id match first, then a unique prefix.
fn resolve_id(context: &ShellContext, needle: &str) -> Result<TransactionId, CommandError> {
    if needle.trim().is_empty() {
        return Err(CommandError::InvalidArguments(
            "transaction id must not be empty".into(),
        ));
    }
    let exact = TransactionId::from(needle);
    if context.store.find(&exact).is_some() {
        return Ok(exact);
    }

    let matches: Vec<&TransactionId> = context
        .store
        .transactions()
        .iter()
        .map(|transaction| &transaction.id)
        .filter(|id| id.as_str().starts_with(needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).clone()),
        [] => Err(CommandError::Message(format!(
            "No transaction matches `{needle}`."
        ))),
        many => Err(CommandError::InvalidArguments(format!(
            "`{needle}` matches {} transactions; use more characters.",
            many.len()
        ))),
    }
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = parse_kind(args.first())?;
    let transactions = context.store.transactions_by_kind(kind);
    if transactions.is_empty() {
        output::info("No transactions recorded.");
        return Ok(());
    }

    let title = match kind {
        Some(TransactionKind::Expense) => "Expenses",
        Some(TransactionKind::Income) => "Income",
        None => "Transactions",
    };
    output::section(title);
    output::plain(format!(
        "{:<8}  {:<10}  {:<16}  {:<30}  {:>12}",
        "ID", "Date", "Category", "Description", "Amount"
    ));
    for transaction in &transactions {
        let amount = format!("{:>12}", context.format_signed(transaction));
        output::plain(format!(
            "{:<8}  {:<10}  {:<16}  {:<30}  {}",
            short_id(&transaction.id),
            context.format_date(transaction.date),
            transaction.category,
            truncate_description(&transaction.description),
            output::amount(&amount, transaction.is_expense()),
        ));
    }
    output::plain(format!("{} shown.", transactions.len()));
    Ok(())
}

pub(crate) fn short_id(id: &TransactionId) -> String {
    id.as_str().chars().take(SHORT_ID_LEN).collect()
}
