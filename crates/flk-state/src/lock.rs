//! Lock-state store.
//!
//! # Invariants
//!
//! - **Registry-complete**: one `locked` flag per registry id, nothing else.
//! - **Fail-closed queries**: `is_locked` on an unknown id reports `true`;
//!   a control the form does not know about is never reported editable.
//! - **Resting configuration is a pure function of the values**: `lock_all`
//!   fully determines every flag from `exceptions`, so two calls with the
//!   same values produce the same map.

use flk_fields::{FieldId, FieldRegistry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::Snapshot;

/// One field whose lock flag changed during a dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockChange {
    pub field: FieldId,
    pub locked: bool,
}

/// Per-field editability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockState {
    locked: BTreeMap<FieldId, bool>,
}

impl LockState {
    /// Every registry field locked.
    pub fn all_locked(registry: &FieldRegistry) -> Self {
        Self {
            locked: registry.list_fields().map(|id| (id.clone(), true)).collect(),
        }
    }

    /// Returns `true` if the flag changed. Unknown ids are ignored.
    pub fn set_locked(&mut self, id: &FieldId, locked: bool) -> bool {
        match self.locked.get_mut(id) {
            Some(flag) if *flag != locked => {
                *flag = locked;
                true
            }
            _ => false,
        }
    }

    pub fn is_locked(&self, id: &FieldId) -> bool {
        self.locked.get(id).copied().unwrap_or(true)
    }

    /// Lock every known field not in `exceptions`; unlock the ones in it.
    pub fn lock_all(&mut self, exceptions: &BTreeSet<FieldId>) {
        for (id, flag) in self.locked.iter_mut() {
            *flag = !exceptions.contains(id);
        }
    }

    /// Currently editable ids, in id order.
    pub fn unlocked(&self) -> impl Iterator<Item = &FieldId> + '_ {
        self.locked.iter().filter(|(_, l)| !**l).map(|(id, _)| id)
    }

    /// Deltas that turn `before` into `self`.
    pub fn changes_from(&self, before: &LockState) -> Vec<LockChange> {
        self.locked
            .iter()
            .filter(|(id, l)| before.locked.get(*id) != Some(*l))
            .map(|(id, l)| LockChange {
                field: id.clone(),
                locked: *l,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Conditional exception
// ---------------------------------------------------------------------------

/// `control` is editable at rest only while `when_field` equals `equals`.
///
/// Legacy rule: the "BCF Number" button is enabled only when the proposal
/// prefix is `BCF`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionalUnlock {
    pub control: FieldId,
    pub when_field: FieldId,
    pub equals: String,
}

impl ConditionalUnlock {
    pub fn holds(&self, values: &Snapshot) -> bool {
        values.get(&self.when_field) == Some(self.equals.as_str())
    }
}

/// Exceptions for `lock_all`, evaluated against the values as they are now.
///
/// Never cache the result: the prefix field may change between calls.
pub fn resting_exceptions(rules: &[ConditionalUnlock], values: &Snapshot) -> BTreeSet<FieldId> {
    rules
        .iter()
        .filter(|r| r.holds(values))
        .map(|r| r.control.clone())
        .collect()
}
