//! Shell state and command dispatch.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use pocketwise_config::{home_override, Config, ConfigManager};
use pocketwise_core::{
    format::{CurrencyFormatter, DateFormatter, PatternDateFormatter, SymbolFormatter},
    report::ReportGenerator,
    time::SystemClock,
    LedgerStore, LoadReport,
};
use pocketwise_domain::Transaction;
use pocketwise_storage_json::JsonLedgerStorage;
use strsim::levenshtein;

use crate::cli::commands::{self, CommandDefinition, CommandRegistry};
use crate::cli::error::{CliError, CommandError};
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::shell::parse_command_line;

const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Everything a command handler can reach: the ledger store, preferences
/// and the formatters derived from them.
pub struct ShellContext {
    mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) store: LedgerStore,
    config: Config,
    data_dir: PathBuf,
    currency: SymbolFormatter,
    dates: PatternDateFormatter,
    theme: ColorfulTheme,
    pub(crate) last_command: Option<String>,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Loads preferences, opens the on-disk ledger and reports load repairs.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::discover()?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "configuration unreadable; using defaults");
                output::warning(format!("Configuration unreadable ({err}); using defaults."));
                Config::default()
            }
        };
        if !config_manager.config_path().exists() {
            if let Err(err) = config_manager.save(&config) {
                tracing::warn!(error = %err, "could not write default configuration");
            }
        }

        let data_dir = config.resolve_data_dir(home_override().as_deref());
        let storage = JsonLedgerStorage::new(&data_dir)?;
        let (store, report) = LedgerStore::open(Box::new(storage), Arc::new(SystemClock));
        tracing::debug!(data_dir = %data_dir.display(), "shell ready");

        let context = Self::with_store(mode, store, config, data_dir);
        context.report_load(&report);
        Ok(context)
    }

    /// Builds a context around an already opened store.
    pub fn with_store(mode: CliMode, store: LedgerStore, config: Config, data_dir: PathBuf) -> Self {
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled,
        });
        let currency = SymbolFormatter::for_currency(&config.currency);
        let dates = match &config.date_format {
            Some(pattern) => PatternDateFormatter::new(pattern.as_str()).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "date format rejected; using locale layout");
                output::warning(format!("{err}; using the {} date layout.", config.locale));
                PatternDateFormatter::for_locale(&config.locale)
            }),
            None => PatternDateFormatter::for_locale(&config.locale),
        };

        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            store,
            config,
            data_dir,
            currency,
            dates,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        }
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn theme(&self) -> &ColorfulTheme {
        &self.theme
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub(crate) fn prompt(&self) -> String {
        "pocketwise> ".to_string()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn format_amount(&self, amount: f64) -> String {
        self.currency.format_amount(amount)
    }

    pub(crate) fn format_signed(&self, transaction: &Transaction) -> String {
        self.currency
            .format_signed(transaction.amount, transaction.is_expense())
    }

    pub(crate) fn format_date(&self, date: NaiveDate) -> String {
        self.dates.format_date(date)
    }

    /// Report generator using the configured currency and date layout.
    pub(crate) fn report_generator(&self) -> ReportGenerator {
        ReportGenerator::new(Box::new(self.currency.clone()), Box::new(self.dates.clone()))
    }

    fn report_load(&self, report: &LoadReport) {
        if let Some(reason) = &report.recovered_from {
            output::warning(format!(
                "Stored data could not be read ({reason}); starting with an empty ledger."
            ));
        }
        for warning in &report.warnings {
            output::warning(warning);
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenizes and dispatches one input line.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = closest_command(self.registry.names(), input) {
            output::hint(format!("Did you mean `{}`?", best));
        }
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        Ok(self.confirm("Exit PocketWise?")?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => {
                tracing::debug!(command = ?self.last_command, error = %other, "command failed");
                output::error(other);
            }
        }
    }
}

/// Nearest command name within a small edit distance.
pub(crate) fn closest_command<'a>(
    names: impl Iterator<Item = &'a str>,
    input: &str,
) -> Option<&'a str> {
    let input = input.to_lowercase();
    names
        .map(|name| (levenshtein(name, &input), name))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

#[cfg(test)]
pub(crate) mod tests {
    use pocketwise_core::{storage::MemoryStorage, time::FixedClock};
    use pocketwise_domain::TransactionKind;
    use tempfile::tempdir;

    use super::*;

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    pub(crate) fn script_context(data_dir: PathBuf) -> ShellContext {
        let (store, _) = LedgerStore::open(
            Box::new(MemoryStorage::new()),
            Arc::new(FixedClock(today())),
        );
        let config = Config {
            ui_color_enabled: false,
            ..Config::default()
        };
        ShellContext::with_store(CliMode::Script, store, config, data_dir)
    }

    fn run(context: &mut ShellContext, lines: &[&str]) {
        for line in lines {
            if let Err(err) = context.process_line(line) {
                context.report_error(err);
            }
        }
    }

    #[test]
    fn script_records_and_summarises() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path().to_path_buf());
        run(
            &mut context,
            &[
                "add-expense 50 Food Groceries 2026-10-02",
                "add-income 1000 Salary 'October pay'",
                "budget 200",
                "summary",
            ],
        );

        let store = context.store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_by_kind(TransactionKind::Expense), 50.0);
        assert_eq!(store.remaining_budget(), 150.0);
        assert_eq!(store.transactions()[0].description, "October pay");
        assert_eq!(store.transactions()[0].date, today());
    }

    #[test]
    fn invalid_input_is_reported_without_changes() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path().to_path_buf());

        let err = context.process_line("add-expense ten Food Lunch").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        let err = context.process_line("add-expense -5 Food Lunch").unwrap_err();
        assert!(matches!(err, CommandError::Core(ref core) if core.is_validation()));
        let err = context.process_line("budget -10").unwrap_err();
        assert!(matches!(err, CommandError::Core(_)));

        assert!(context.store().is_empty());
        assert_eq!(context.store().monthly_budget(), 0.0);
    }

    #[test]
    fn delete_accepts_unique_prefix() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path().to_path_buf());
        run(&mut context, &["add-expense 5 Food Snack"]);
        let id = context.store().transactions()[0].id.to_string();

        context
            .process_line(&format!("delete {}", &id[..8]))
            .unwrap();
        assert!(context.store().is_empty());

        let err = context.process_line("delete missing").unwrap_err();
        assert!(matches!(err, CommandError::Message(_)));
    }

    #[test]
    fn delete_rejects_blank_id() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path().to_path_buf());
        run(&mut context, &["add-expense 5 Food Snack"]);

        let err = context.process_line("delete ''").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        let err = context.process_line("delete '   '").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        assert_eq!(context.store().len(), 1);
    }

    #[test]
    fn broken_date_format_falls_back_to_locale() {
        let dir = tempdir().unwrap();
        let (store, _) = LedgerStore::open(
            Box::new(MemoryStorage::new()),
            Arc::new(FixedClock(today())),
        );
        let config = Config {
            ui_color_enabled: false,
            date_format: Some("%d/%m/%".into()),
            ..Config::default()
        };
        let mut context =
            ShellContext::with_store(CliMode::Script, store, config, dir.path().to_path_buf());
        run(&mut context, &["add-expense 5 Food Snack 2026-03-07"]);

        assert_eq!(context.format_date(today()), "10/16/2026");
        context.process_line("list").unwrap();
        context.process_line("report").unwrap();
        let out = dir.path().to_string_lossy().to_string();
        context
            .process_line(&format!("export-pdf '{out}'"))
            .unwrap();
        assert!(dir.path().join("pocketwise-financial-report.pdf").exists());
    }

    #[test]
    fn exports_land_in_the_requested_directory() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path().to_path_buf());
        let out = dir.path().join("out");
        run(&mut context, &["add-income 10 Gift Birthday"]);

        let out_arg = out.display().to_string();
        context
            .process_line(&format!("export-json '{out_arg}'"))
            .unwrap();
        context
            .process_line(&format!("export-pdf '{out_arg}'"))
            .unwrap();

        assert!(out.join("pocketwise-export-2026-10-16.json").exists());
        assert!(out.join("pocketwise-financial-report.pdf").exists());
    }

    #[test]
    fn clear_in_script_mode_needs_no_confirmation() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path().to_path_buf());
        run(&mut context, &["add-expense 5 Food Snack", "budget 50", "clear"]);
        assert!(context.store().is_empty());
        assert_eq!(context.store().monthly_budget(), 0.0);
    }

    #[test]
    fn exit_stops_the_loop() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path().to_path_buf());
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
        assert!(!context.running);
    }

    #[test]
    fn unknown_commands_are_not_errors() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path().to_path_buf());
        assert_eq!(
            context.process_line("sumary").unwrap(),
            LoopControl::Continue
        );
        assert_eq!(context.last_command.as_deref(), Some("sumary"));
    }

    #[test]
    fn suggestions_pick_the_nearest_name() {
        let names = ["summary", "budget", "month"];
        assert_eq!(
            closest_command(names.iter().copied(), "SUMARY"),
            Some("summary")
        );
        assert_eq!(closest_command(names.iter().copied(), "xyzzyplugh"), None);
    }
}
