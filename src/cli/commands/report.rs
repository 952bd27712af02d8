use std::{env, path::PathBuf};

use pocketwise_storage_json::{export_json, export_pdf};

use super::CommandDefinition;
use crate::cli::context::ShellContext;
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "report",
            "Preview the finance report",
            "report",
            cmd_report,
        ),
        CommandDefinition::new(
            "export-json",
            "Write all data as pocketwise-export-YYYY-MM-DD.json",
            "export-json [dir]",
            cmd_export_json,
        ),
        CommandDefinition::new(
            "export-pdf",
            "Write the finance report as pocketwise-financial-report.pdf",
            "export-pdf [dir]",
            cmd_export_pdf,
        ),
    ]
}

fn cmd_report(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let document = context
        .report_generator()
        .generate(&context.store.report_snapshot());
    output::plain(document.to_text());
    Ok(())
}

fn cmd_export_json(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = target_dir(args)?;
    let path = export_json(context.store.ledger(), &dir, context.store.today())?;
    output::success(format!("Data exported to {}.", path.display()));
    Ok(())
}

fn cmd_export_pdf(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = target_dir(args)?;
    let document = context
        .report_generator()
        .generate(&context.store.report_snapshot());
    let path = export_pdf(&document, &dir)?;
    output::success(format!(
        "Report exported to {} ({} page(s)).",
        path.display(),
        document.page_count()
    ));
    Ok(())
}

/// The given directory, else the working directory.
fn target_dir(args: &[&str]) -> Result<PathBuf, CommandError> {
    match args {
        [] => Ok(env::current_dir()?),
        [dir] => Ok(PathBuf::from(dir)),
        _ => Err(CommandError::InvalidArguments(
            "expected at most one directory; quote paths that contain spaces".into(),
        )),
    }
}
