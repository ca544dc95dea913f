//! Push confirmation prompt.
//!
//! Uses dialoguer for the terminal prompt.

use anyhow::{Context, Result};
use dialoguer::{Input, theme::ColorfulTheme};

use launchpad_core::prelude::PushGate;
use launchpad_core::workflow::is_affirmative;

/// Asks on the terminal before pushing. `--yes` answers for the operator.
pub struct TerminalGate {
    assume_yes: bool,
    theme: ColorfulTheme,
}

impl TerminalGate {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            theme: ColorfulTheme::default(),
        }
    }
}

impl PushGate for TerminalGate {
    fn confirm(&mut self, remote_url: &str) -> Result<bool> {
        if self.assume_yes {
            tracing::info!("push confirmed by --yes");
            return Ok(true);
        }

        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(format!("Push to {}? (y/N)", remote_url))
            .allow_empty(true)
            .interact_text()
            .context("Failed to read confirmation")?;

        Ok(is_affirmative(&answer))
    }
}
