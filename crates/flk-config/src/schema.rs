//! Serde shape of a form definition document.

use anyhow::{Context, Result};
use flk_engine::{Guard, RuleTrigger, TransitionEngine, TransitionRule};
use flk_fields::{FieldDef, FieldId, FieldRegistry, FocusTarget};
use flk_session::{FormSpec, Messages, DEFAULT_TOAST_TTL_MS};
use flk_state::ConditionalUnlock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormConfig {
    #[serde(default)]
    pub form: FormSection,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub conditional_unlocks: Vec<ConditionalUnlock>,
    #[serde(default)]
    pub rules: Vec<RuleDoc>,
    #[serde(default)]
    pub messages: Messages,
    #[serde(default)]
    pub toast: ToastSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSection {
    pub name: String,
}

impl Default for FormSection {
    fn default() -> Self {
        Self {
            name: "Prototype".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToastSection {
    pub ttl_ms: u64,
}

impl Default for ToastSection {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TOAST_TTL_MS,
        }
    }
}

/// One rule as written in YAML. `focus` is a field id or `commit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDoc {
    pub on: RuleTrigger,
    #[serde(default)]
    pub when: Option<Guard>,
    #[serde(default)]
    pub set: BTreeMap<FieldId, String>,
    #[serde(default)]
    pub lock_all: bool,
    #[serde(default)]
    pub unlock: Vec<FieldId>,
    #[serde(default)]
    pub lock: Vec<FieldId>,
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default)]
    pub notify: Option<String>,
    #[serde(default)]
    pub dialog: Option<String>,
}

impl RuleDoc {
    pub fn to_rule(&self) -> TransitionRule {
        TransitionRule {
            on: self.on.clone(),
            when: self.when.clone(),
            set: self
                .set
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            lock_all: self.lock_all,
            unlock: self.unlock.clone(),
            lock: self.lock.clone(),
            focus: self.focus.as_deref().map(parse_focus),
            notify: self.notify.clone(),
            dialog: self.dialog.clone(),
        }
    }
}

fn parse_focus(s: &str) -> FocusTarget {
    match s.trim() {
        "commit" => FocusTarget::Commit,
        other => FocusTarget::Field(FieldId::new(other)),
    }
}

impl FormConfig {
    pub fn build(&self) -> Result<FormSpec> {
        let registry = FieldRegistry::new(self.fields.clone())
            .with_context(|| format!("form '{}': invalid field list", self.form.name))?;
        let engine = TransitionEngine::new(
            self.rules.iter().map(RuleDoc::to_rule).collect(),
            self.conditional_unlocks.clone(),
        );

        let mut spec = FormSpec::new(self.form.name.clone(), registry, engine)
            .with_messages(self.messages.clone());
        spec.toast_ttl = Duration::from_millis(self.toast.ttl_ms);
        Ok(spec)
    }
}
