//! Terminal prompts backed by `dialoguer`.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};
use ewc::{ConnectionError, Prompter};

/// Asks on the controlling terminal.
///
/// Secrets are hidden unless the user answers yes to "Show Password?".
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_error(e: dialoguer::Error) -> ConnectionError {
    ConnectionError::Prompt(e.to_string())
}

impl Prompter for TerminalPrompter {
    fn select_one(&self, title: &str, options: &[String]) -> ewc::Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(title)
            .items(options)
            .default(0)
            .interact()
            .map_err(prompt_error)
    }

    fn prompt_text(&self, title: &str) -> ewc::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(title)
            .interact_text()
            .map_err(prompt_error)
    }

    fn prompt_secret(&self, title: &str) -> ewc::Result<String> {
        let visible = Confirm::with_theme(&self.theme)
            .with_prompt("Show Password?")
            .default(false)
            .interact()
            .map_err(prompt_error)?;

        let answer = if visible {
            Input::<String>::with_theme(&self.theme)
                .with_prompt(title)
                .allow_empty(true)
                .interact_text()
        } else {
            Password::with_theme(&self.theme)
                .with_prompt(title)
                .allow_empty_password(true)
                .interact()
        };
        answer.map_err(prompt_error)
    }
}
