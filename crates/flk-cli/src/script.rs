//! Replay script format: one step per line.
//!
//! ```text
//! # comment
//! action Answered
//! change CFES_Date 2026-01-05
//! input Description pole swap at 5th & Main
//! focus-commit
//! commit
//! undo
//! quit
//! ```

use anyhow::{anyhow, bail, Result};
use flk_fields::FieldId;
use flk_session::Trigger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Dispatch(Trigger),
    /// Raw keystroke-level update; no rules fire.
    Input { field: FieldId, value: String },
}

pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    let mut out = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = parse_line(line).map_err(|e| anyhow!("script line {}: {e}", i + 1))?;
        out.push(step);
    }
    Ok(out)
}

fn parse_line(line: &str) -> Result<Step> {
    let (cmd, rest) = split_word(line);
    let step = match cmd {
        "open" => Step::Dispatch(Trigger::Open),
        "commit" => Step::Dispatch(Trigger::Commit),
        "undo" => Step::Dispatch(Trigger::Undo),
        "quit" => Step::Dispatch(Trigger::Quit),
        "help" => Step::Dispatch(Trigger::Help),
        "focus-commit" => Step::Dispatch(Trigger::FocusCommit),
        "action" => {
            let (name, _) = split_word(rest);
            if name.is_empty() {
                bail!("action needs a name");
            }
            Step::Dispatch(Trigger::action(name))
        }
        "change" | "input" => {
            let (field, value) = split_word(rest);
            if field.is_empty() {
                bail!("{cmd} needs a field id");
            }
            if cmd == "change" {
                Step::Dispatch(Trigger::change(field, value))
            } else {
                Step::Input {
                    field: FieldId::new(field),
                    value: value.to_string(),
                }
            }
        }
        other => bail!("unknown command '{other}'"),
    };
    Ok(step)
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(pos) => (&s[..pos], s[pos..].trim()),
        None => (s, ""),
    }
}
