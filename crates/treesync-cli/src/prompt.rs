//! Confirmation prompt
//!
//! Uses dialoguer on a terminal and a plain `y/N` line read otherwise, so
//! answers can be piped in.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Confirm as Question;
use treesync_core::{Confirm, SyncPlan};

#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, plan: &SyncPlan) -> treesync_core::Result<bool> {
        let question = format!("Apply {} change(s)?", plan.diff().len());
        if io::stdin().is_terminal() {
            return Question::new()
                .with_prompt(question)
                .default(false)
                .interact()
                .map_err(|e| io::Error::other(e).into());
        }

        print!("{} [y/N] ", question);
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
