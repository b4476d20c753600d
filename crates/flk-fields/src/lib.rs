//! flk-fields
//!
//! Field Registry: the fixed catalog of editable fields on one form.
//!
//! The registry is pure data. It is built once (the only fallible step) and
//! never mutated afterwards. Every other crate treats an id outside the
//! registry as "not on this form" and ignores it, so a partial field set on a
//! different screen degrades to no-ops instead of failures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable field identity (the legacy control name, e.g. `CFES_Date`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub String);

impl FieldId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Semantic kind of a field. Values are string-typed regardless of kind;
/// callers parse dates/choices further if they need to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Date,
    Choice,
    /// A clickable control: lock-state is tracked, value is always "".
    Control,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Choice => "choice",
            FieldKind::Control => "control",
        }
    }
}

/// One registry entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub id: FieldId,
    pub kind: FieldKind,
    /// Value rendered when the form opens. Missing means "".
    #[serde(default)]
    pub default: Option<String>,
}

impl FieldDef {
    pub fn new(id: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: FieldId::new(id),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, v: impl Into<String>) -> Self {
        self.default = Some(v.into());
        self
    }
}

/// Where the UI collaborator should move input focus.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    Field(FieldId),
    /// The commit ("Save") control.
    Commit,
}

impl fmt::Display for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusTarget::Field(id) => write!(f, "{id}"),
            FocusTarget::Commit => f.write_str("commit"),
        }
    }
}

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Returned when a registry cannot be built from the given definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    EmptyId { index: usize },
    DuplicateId(FieldId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::EmptyId { index } => {
                write!(f, "field registry: empty id at position {index}")
            }
            RegistryError::DuplicateId(id) => write!(f, "field registry: duplicate id '{id}'"),
        }
    }
}

impl std::error::Error for RegistryError {}

// ---------------------------------------------------------------------------
// FieldRegistry
// ---------------------------------------------------------------------------

/// Ordered, immutable field catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRegistry {
    defs: Vec<FieldDef>,
    index: BTreeMap<FieldId, usize>,
}

impl FieldRegistry {
    pub fn new(defs: Vec<FieldDef>) -> Result<Self, RegistryError> {
        let mut index = BTreeMap::new();
        for (i, def) in defs.iter().enumerate() {
            if def.id.as_str().trim().is_empty() {
                return Err(RegistryError::EmptyId { index: i });
            }
            if index.insert(def.id.clone(), i).is_some() {
                return Err(RegistryError::DuplicateId(def.id.clone()));
            }
        }
        Ok(Self { defs, index })
    }

    /// Field ids in declaration order.
    pub fn list_fields(&self) -> impl Iterator<Item = &FieldId> + '_ {
        self.defs.iter().map(|d| &d.id)
    }

    pub fn defs(&self) -> &[FieldDef] {
        &self.defs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &FieldId) -> Option<&FieldDef> {
        self.index.get(id).map(|&i| &self.defs[i])
    }

    pub fn kind_of(&self, id: &FieldId) -> Option<FieldKind> {
        self.get(id).map(|d| d.kind)
    }

    /// Initial values as rendered on open (missing default = "").
    pub fn defaults(&self) -> BTreeMap<FieldId, String> {
        self.defs
            .iter()
            .map(|d| (d.id.clone(), d.default.clone().unwrap_or_default()))
            .collect()
    }
}
