use flk_engine::TransitionEngine;
use flk_fields::FieldRegistry;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Toast display time of the legacy prototype.
pub const DEFAULT_TOAST_TTL_MS: u64 = 3200;

/// User-facing strings emitted by the session controller itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    pub saved: String,
    pub nothing_to_undo: String,
    pub undo_prompt: String,
    pub reverted: String,
    pub quit_prompt: String,
    pub quit: String,
    pub help: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            saved: "Saved.".to_string(),
            nothing_to_undo: "Nothing to undo.".to_string(),
            undo_prompt: "Undo changes? (Revert to last saved state)".to_string(),
            reverted: "Reverted to last saved state.".to_string(),
            quit_prompt: "You have unsaved changes. Quit anyway?".to_string(),
            quit: "Quit.".to_string(),
            help: "Help: Use the action buttons to unlock fields, then click Save.".to_string(),
        }
    }
}

/// Everything a session needs to know about one form.
#[derive(Clone, Debug)]
pub struct FormSpec {
    pub name: String,
    pub registry: FieldRegistry,
    pub engine: TransitionEngine,
    pub messages: Messages,
    pub toast_ttl: Duration,
}

impl FormSpec {
    pub fn new(name: impl Into<String>, registry: FieldRegistry, engine: TransitionEngine) -> Self {
        Self {
            name: name.into(),
            registry,
            engine,
            messages: Messages::default(),
            toast_ttl: Duration::from_millis(DEFAULT_TOAST_TTL_MS),
        }
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }
}
