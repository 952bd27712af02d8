pub mod commands;
mod context;
pub mod error;
mod help;
pub mod io;
pub mod output;
mod shell;

pub use context::{CliMode, ShellContext};
pub use error::{CliError, CommandError};
pub use shell::{run_cli, SCRIPT_ENV};
