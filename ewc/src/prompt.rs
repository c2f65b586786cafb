//! User interaction capability.
//!
//! The connection flow needs a few answers from the user: which network to
//! join, the name of a hidden network and, sometimes, a password. All of
//! them are asked through [`Prompter`] so a terminal UI, a script or a test
//! can supply them.

use crate::Result;

/// Synchronous user prompts.
pub trait Prompter {
    /// Shows `options` under `title` and returns the index of the one chosen.
    fn select_one(&self, title: &str, options: &[String]) -> Result<usize>;

    /// Asks for a plain text value, such as the SSID of a hidden network.
    fn prompt_text(&self, title: &str) -> Result<String>;

    /// Asks for a secret value. An empty string is a valid answer.
    fn prompt_secret(&self, title: &str) -> Result<String>;
}
