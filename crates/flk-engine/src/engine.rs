//! Rule application.
//!
//! # Order inside one dispatch
//!
//! For every rule matching the trigger, in table order, whose guard passes
//! against the state left by the previous rule:
//!
//! 1. value deltas (`set`);
//! 2. `lock_all`, with conditional exceptions evaluated on the updated values;
//! 3. explicit `unlock`, then `lock`;
//! 4. focus / notification / dialog: the last rule that sets one wins.

use flk_fields::{FieldId, FocusTarget};
use flk_state::{resting_exceptions, ConditionalUnlock, LockState, Snapshot};
use std::collections::BTreeSet;
use tracing::debug;

use crate::{RuleTrigger, TransitionRule};

/// Planned outcome of one trigger. Nothing is applied until the caller
/// adopts `lock` and `values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub lock: LockState,
    pub values: Snapshot,
    pub focus: Option<FocusTarget>,
    pub notify: Option<String>,
    pub dialog: Option<String>,
    pub rules_applied: usize,
}

/// Static rule table plus the conditional exceptions of the resting state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionEngine {
    rules: Vec<TransitionRule>,
    conditional: Vec<ConditionalUnlock>,
}

impl TransitionEngine {
    pub fn new(rules: Vec<TransitionRule>, conditional: Vec<ConditionalUnlock>) -> Self {
        Self { rules, conditional }
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    pub fn conditional(&self) -> &[ConditionalUnlock] {
        &self.conditional
    }

    /// Put `lock` into the resting configuration for `values`.
    pub fn rest(&self, lock: &mut LockState, values: &Snapshot) {
        lock.lock_all(&resting_exceptions(&self.conditional, values));
    }

    /// Plan `trigger` against copies of the given state.
    ///
    /// Returns `None` when no rule matched or every matching guard failed.
    pub fn plan(&self, trigger: &RuleTrigger, lock: &LockState, values: &Snapshot) -> Option<Plan> {
        let mut plan = Plan {
            lock: lock.clone(),
            values: values.clone(),
            focus: None,
            notify: None,
            dialog: None,
            rules_applied: 0,
        };

        for (idx, rule) in self.rules.iter().enumerate() {
            if &rule.on != trigger {
                continue;
            }
            if let Some(guard) = &rule.when {
                if !guard.passes(&plan.lock, &plan.values) {
                    debug!(rule = idx, %trigger, "guard not satisfied");
                    continue;
                }
            }
            self.apply_rule(rule, &mut plan);
            plan.rules_applied += 1;
            debug!(rule = idx, %trigger, "rule applied");
        }

        (plan.rules_applied > 0).then_some(plan)
    }

    fn apply_rule(&self, rule: &TransitionRule, plan: &mut Plan) {
        for (id, v) in &rule.set {
            plan.values.set(id, v.clone());
        }
        if rule.lock_all {
            self.rest(&mut plan.lock, &plan.values);
        }
        for id in &rule.unlock {
            plan.lock.set_locked(id, false);
        }
        for id in &rule.lock {
            plan.lock.set_locked(id, true);
        }
        if rule.focus.is_some() {
            plan.focus = rule.focus.clone();
        }
        if rule.notify.is_some() {
            plan.notify = rule.notify.clone();
        }
        if rule.dialog.is_some() {
            plan.dialog = rule.dialog.clone();
        }
    }

    /// Every field id mentioned anywhere in the table or the conditional list.
    pub fn referenced_fields(&self) -> BTreeSet<FieldId> {
        let mut out: BTreeSet<FieldId> = self
            .rules
            .iter()
            .flat_map(|r| r.referenced_fields())
            .cloned()
            .collect();
        for c in &self.conditional {
            out.insert(c.control.clone());
            out.insert(c.when_field.clone());
        }
        out
    }
}
