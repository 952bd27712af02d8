use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::cli::error::CommandError;

/// Ask a yes/no question on the terminal.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Prompt for free-form text. Empty answers are rejected by the prompt.
pub fn prompt_text(theme: &ColorfulTheme, prompt: &str) -> Result<String, CommandError> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .interact_text()
        .map_err(CommandError::from)
}

/// Prompt for text with a pre-filled default.
pub fn prompt_with_default(
    theme: &ColorfulTheme,
    prompt: &str,
    default: String,
) -> Result<String, CommandError> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .map_err(CommandError::from)
}
