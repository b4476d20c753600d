//! Terminal-backed capability ports for `flk replay`.

use flk_fields::FocusTarget;
use flk_session::{Confirm, Focus, Notify};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

/// Asks on stderr, reads the answer from stdin. EOF or a read error is "no".
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => false,
            Ok(_) => is_yes(&line),
            Err(e) => {
                warn!(error = %e, "confirmation read failed; treating as no");
                false
            }
        }
    }
}

/// Fixed answer from `--assume`.
pub struct AssumeConfirm(pub bool);

impl Confirm for AssumeConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        debug!(prompt, answer = self.0, "confirmation assumed");
        self.0
    }
}

pub struct LogNotify;

impl Notify for LogNotify {
    fn notify(&mut self, message: &str) {
        info!(target: "flk::notify", "{message}");
    }
}

pub struct LogFocus;

impl Focus for LogFocus {
    fn focus(&mut self, target: &FocusTarget) {
        debug!(target: "flk::focus", focus = %target, "focus requested");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
