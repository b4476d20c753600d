use flk_fields::{FieldId, FocusTarget};
use flk_state::{LockState, Snapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RuleTrigger
// ---------------------------------------------------------------------------

/// Named user actions the rule table is keyed on (never raw input events).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTrigger {
    /// A button on the form was clicked (`Answered`, `Command39`, ...).
    Action(String),
    /// After-update of a field: the user finished changing its value.
    Changed(FieldId),
    /// The commit control received input focus.
    CommitFocused,
}

impl fmt::Display for RuleTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTrigger::Action(name) => write!(f, "action:{name}"),
            RuleTrigger::Changed(id) => write!(f, "changed:{id}"),
            RuleTrigger::CommitFocused => f.write_str("commit_focused"),
        }
    }
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/// Optional precondition on a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Guard {
    /// `field`'s current value equals `equals`.
    ValueEquals { field: FieldId, equals: String },
    /// The control is currently editable (a disabled button cannot be clicked).
    Unlocked { unlocked: FieldId },
}

impl Guard {
    /// Unknown ids never satisfy a guard.
    pub fn passes(&self, lock: &LockState, values: &Snapshot) -> bool {
        match self {
            Guard::ValueEquals { field, equals } => values.get(field) == Some(equals.as_str()),
            Guard::Unlocked { unlocked } => !lock.is_locked(unlocked),
        }
    }

    pub fn field(&self) -> &FieldId {
        match self {
            Guard::ValueEquals { field, .. } => field,
            Guard::Unlocked { unlocked } => unlocked,
        }
    }
}

// ---------------------------------------------------------------------------
// TransitionRule
// ---------------------------------------------------------------------------

/// `(trigger, guard?) → (value deltas, lock deltas, focus?, notification?, dialog?)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRule {
    pub on: RuleTrigger,
    pub when: Option<Guard>,
    /// Derived-default writes, applied first.
    pub set: Vec<(FieldId, String)>,
    /// Return to the resting configuration (after `set`, before unlock/lock).
    pub lock_all: bool,
    pub unlock: Vec<FieldId>,
    pub lock: Vec<FieldId>,
    pub focus: Option<FocusTarget>,
    pub notify: Option<String>,
    /// Side dialog the UI collaborator should open (out of core).
    pub dialog: Option<String>,
}

impl TransitionRule {
    pub fn on(trigger: RuleTrigger) -> Self {
        Self {
            on: trigger,
            when: None,
            set: Vec::new(),
            lock_all: false,
            unlock: Vec::new(),
            lock: Vec::new(),
            focus: None,
            notify: None,
            dialog: None,
        }
    }

    pub fn when(mut self, guard: Guard) -> Self {
        self.when = Some(guard);
        self
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.push((FieldId::new(field), value.into()));
        self
    }

    pub fn lock_all(mut self) -> Self {
        self.lock_all = true;
        self
    }

    pub fn unlock<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unlock.extend(fields.into_iter().map(FieldId::new));
        self
    }

    pub fn lock<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock.extend(fields.into_iter().map(FieldId::new));
        self
    }

    pub fn focus(mut self, target: FocusTarget) -> Self {
        self.focus = Some(target);
        self
    }

    pub fn focus_field(self, field: impl Into<String>) -> Self {
        self.focus(FocusTarget::Field(FieldId::new(field)))
    }

    pub fn notify(mut self, message: impl Into<String>) -> Self {
        self.notify = Some(message.into());
        self
    }

    pub fn dialog(mut self, name: impl Into<String>) -> Self {
        self.dialog = Some(name.into());
        self
    }

    /// Every field id this rule mentions, in no particular order.
    pub fn referenced_fields(&self) -> Vec<&FieldId> {
        let mut out: Vec<&FieldId> = Vec::new();
        if let RuleTrigger::Changed(id) = &self.on {
            out.push(id);
        }
        if let Some(g) = &self.when {
            out.push(g.field());
        }
        out.extend(self.set.iter().map(|(id, _)| id));
        out.extend(self.unlock.iter());
        out.extend(self.lock.iter());
        if let Some(FocusTarget::Field(id)) = &self.focus {
            out.push(id);
        }
        out
    }
}
