//! Snapshot store: last-committed values vs current values.
//!
//! A `Snapshot` always carries the full registry key set (absent fields are
//! recorded as ""), so derived structural equality is a well-defined dirty
//! check. A no-op edit that restores the saved value makes the form clean
//! again.

use chrono::{DateTime, Utc};
use flk_fields::{FieldId, FieldRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One field whose value changed during a dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueChange {
    pub field: FieldId,
    pub value: String,
}

/// Registry-keyed field values at one point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    values: BTreeMap<FieldId, String>,
}

impl Snapshot {
    /// Registry-complete snapshot: missing ids become "", unknown ids are dropped.
    pub fn from_values<I>(registry: &FieldRegistry, values: I) -> Self
    where
        I: IntoIterator<Item = (FieldId, String)>,
    {
        let mut out = registry
            .list_fields()
            .map(|id| (id.clone(), String::new()))
            .collect::<BTreeMap<_, _>>();
        for (id, v) in values {
            if let Some(slot) = out.get_mut(&id) {
                *slot = v;
            }
        }
        Self { values: out }
    }

    pub fn get(&self, id: &FieldId) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    /// Returns `true` if the stored value changed. Unknown ids are ignored.
    pub fn set(&mut self, id: &FieldId, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.values.get_mut(id) {
            Some(slot) if *slot != value => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &str)> + '_ {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Deltas that turn `before` into `self`.
    pub fn changes_from(&self, before: &Snapshot) -> Vec<ValueChange> {
        self.values
            .iter()
            .filter(|(id, v)| before.values.get(*id) != Some(*v))
            .map(|(id, v)| ValueChange {
                field: id.clone(),
                value: v.clone(),
            })
            .collect()
    }
}

/// Saved + current snapshots of one session.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    saved: Snapshot,
    current: Snapshot,
    committed_at: Option<DateTime<Utc>>,
}

impl SnapshotStore {
    /// Session open: saved and current both start from the rendered values.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            saved: initial.clone(),
            current: initial,
            committed_at: None,
        }
    }

    pub fn saved(&self) -> &Snapshot {
        &self.saved
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut Snapshot {
        &mut self.current
    }

    pub fn replace_current(&mut self, next: Snapshot) {
        self.current = next;
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.saved
    }

    /// Re-baseline without recording a commit (form re-open).
    pub fn reset(&mut self) {
        self.saved = self.current.clone();
    }

    pub fn commit(&mut self, at: DateTime<Utc>) {
        self.saved = self.current.clone();
        self.committed_at = Some(at);
    }

    /// Current := copy of saved.
    pub fn revert(&mut self) {
        self.current = self.saved.clone();
    }

    pub fn committed_at(&self) -> Option<DateTime<Utc>> {
        self.committed_at
    }
}
