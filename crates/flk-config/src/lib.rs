//! flk-config
//!
//! Layered YAML form definitions.
//!
//! Documents are merged in order (earlier = base, later = override; objects
//! deep-merged, everything else replaced), converted to JSON, canonicalized
//! and hashed. The merged document is then parsed into a [`FormConfig`] and
//! built into the [`FormSpec`] a session runs on.

mod schema;

use anyhow::{Context, Result};
use flk_engine::RuleTrigger;
use flk_fields::{FieldId, FieldKind};
use flk_session::FormSpec;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use tracing::warn;

pub use schema::{FormConfig, FormSection, RuleDoc, ToastSection};

const BUILTIN_PROPOSAL_YAML: &str = include_str!("../forms/proposal.yaml");

#[derive(Debug, Clone)]
pub struct LoadedForm {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
    pub config: FormConfig,
}

impl LoadedForm {
    /// Build the runnable form. Lint findings are logged, never fatal.
    pub fn build(&self) -> Result<FormSpec> {
        let spec = self.config.build()?;
        for finding in lint(&spec) {
            warn!(form = %spec.name, "{finding}");
        }
        Ok(spec)
    }
}

/// The proposal entry form shipped with the crate.
pub fn builtin_proposal_form() -> Result<LoadedForm> {
    load_layered_yaml_from_strings(&[BUILTIN_PROPOSAL_YAML])
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedForm> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedForm> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let config: FormConfig =
        serde_json::from_value(merged.clone()).context("invalid form definition")?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedForm {
        config_hash,
        canonical_json,
        config_json: merged,
        config,
    })
}

/// Rule-table entries that degrade to no-ops at runtime: references to ids
/// outside the registry, after-update rules on controls (a control is never
/// edited) and value writes into controls (a control's value stays "").
/// Reported rather than rejected.
pub fn lint(spec: &FormSpec) -> Vec<String> {
    let mut out = Vec::new();
    for id in spec.engine.referenced_fields() {
        if !spec.registry.contains(&id) {
            out.push(format!("FORM_UNKNOWN_FIELD id={id}"));
        }
    }

    let is_control = |id: &FieldId| spec.registry.kind_of(id) == Some(FieldKind::Control);
    for rule in spec.engine.rules() {
        if let RuleTrigger::Changed(id) = &rule.on {
            if is_control(id) {
                out.push(format!("FORM_CHANGE_ON_CONTROL id={id}"));
            }
        }
        for (id, _) in &rule.set {
            if is_control(id) {
                out.push(format!("FORM_SET_ON_CONTROL id={id}"));
            }
        }
    }
    out
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // serde_json::Map is ordered by key (no preserve_order), so this is stable.
    serde_json::to_string(v).context("canonical json serialize failed")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
