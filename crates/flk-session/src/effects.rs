use flk_fields::{FieldId, FocusTarget};
use flk_state::{LockChange, ValueChange};
use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// What the UI collaborator asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Re-run the initial lock-down and re-baseline the saved snapshot.
    Open,
    /// A button on the form was clicked.
    Action(String),
    /// The user finished editing `field` (after-update).
    Change { field: FieldId, value: String },
    /// The commit control received input focus.
    FocusCommit,
    Commit,
    Undo,
    Quit,
    Help,
}

impl Trigger {
    pub fn action(name: impl Into<String>) -> Self {
        Trigger::Action(name.into())
    }

    pub fn change(field: impl Into<String>, value: impl Into<String>) -> Self {
        Trigger::Change {
            field: FieldId::new(field),
            value: value.into(),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Open => f.write_str("open"),
            Trigger::Action(name) => write!(f, "action:{name}"),
            Trigger::Change { field, .. } => write!(f, "change:{field}"),
            Trigger::FocusCommit => f.write_str("focus_commit"),
            Trigger::Commit => f.write_str("commit"),
            Trigger::Undo => f.write_str("undo"),
            Trigger::Quit => f.write_str("quit"),
            Trigger::Help => f.write_str("help"),
        }
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Terminal outcome of one dispatch. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    /// No rule matched the trigger, or every matching guard failed.
    NoRule,
    /// Undo while clean: user feedback only, no confirmation asked.
    NothingToUndo,
    /// Confirmation declined; nothing was mutated.
    Declined,
    /// Quit completed; the session is now closed.
    Closed,
    /// The session was already closed; the trigger was ignored.
    SessionClosed,
    /// The id is not a value-bearing field on this form; ignored.
    UnknownField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationRecord {
    pub prompt: String,
    pub accepted: bool,
}

/// Side-effect descriptor returned by every dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Effects {
    pub trigger: String,
    pub outcome: Outcome,
    pub focus: Option<FocusTarget>,
    pub notification: Option<String>,
    pub confirmation: Option<ConfirmationRecord>,
    pub dialog: Option<String>,
    pub lock_changes: Vec<LockChange>,
    pub value_changes: Vec<ValueChange>,
    pub dirty: bool,
}

impl Effects {
    pub(crate) fn new(trigger: &Trigger, outcome: Outcome) -> Self {
        Self {
            trigger: trigger.to_string(),
            outcome,
            focus: None,
            notification: None,
            confirmation: None,
            dialog: None,
            lock_changes: Vec::new(),
            value_changes: Vec::new(),
            dirty: false,
        }
    }

    pub(crate) fn notify(mut self, message: &str) -> Self {
        self.notification = Some(message.to_string());
        self
    }

    pub(crate) fn confirmed(mut self, prompt: &str, accepted: bool) -> Self {
        self.confirmation = Some(ConfirmationRecord {
            prompt: prompt.to_string(),
            accepted,
        });
        self
    }

    /// Whether this dispatch changed any session state.
    pub fn mutated(&self) -> bool {
        !self.lock_changes.is_empty() || !self.value_changes.is_empty()
    }
}
