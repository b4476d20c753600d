//! Scenario: field registry construction and lookups
//!
//! # Invariants under test
//!
//! 1. `list_fields` preserves declaration order.
//! 2. Duplicate and empty ids are rejected at construction.
//! 3. Unknown ids are simply absent (no panic, `None`/`false`).
//! 4. `defaults` is registry-complete; a missing default is "".

use flk_fields::*;

fn sample() -> FieldRegistry {
    FieldRegistry::new(vec![
        FieldDef::new("Proposal_Prefix", FieldKind::Choice).with_default("BCF"),
        FieldDef::new("CFES_Date", FieldKind::Date),
        FieldDef::new("Description", FieldKind::Text),
        FieldDef::new("BCF_Number", FieldKind::Control),
    ])
    .expect("valid registry")
}

#[test]
fn list_fields_keeps_declaration_order() {
    let reg = sample();
    let ids: Vec<&str> = reg.list_fields().map(FieldId::as_str).collect();
    assert_eq!(
        ids,
        vec!["Proposal_Prefix", "CFES_Date", "Description", "BCF_Number"]
    );
    assert_eq!(reg.len(), 4);
}

#[test]
fn duplicate_id_is_rejected() {
    let err = FieldRegistry::new(vec![
        FieldDef::new("A", FieldKind::Text),
        FieldDef::new("A", FieldKind::Date),
    ])
    .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateId(FieldId::new("A")));
    assert!(err.to_string().contains("duplicate id 'A'"));
}

#[test]
fn empty_id_is_rejected() {
    let err = FieldRegistry::new(vec![
        FieldDef::new("A", FieldKind::Text),
        FieldDef::new("  ", FieldKind::Text),
    ])
    .unwrap_err();
    assert_eq!(err, RegistryError::EmptyId { index: 1 });
}

#[test]
fn unknown_ids_are_absent_not_fatal() {
    let reg = sample();
    let ghost = FieldId::new("Nope");
    assert!(!reg.contains(&ghost));
    assert!(reg.get(&ghost).is_none());
    assert!(reg.kind_of(&ghost).is_none());
}

#[test]
fn defaults_are_registry_complete() {
    let reg = sample();
    let d = reg.defaults();
    assert_eq!(d.len(), reg.len());
    assert_eq!(d[&FieldId::new("Proposal_Prefix")], "BCF");
    assert_eq!(d[&FieldId::new("CFES_Date")], "");
    assert_eq!(
        reg.kind_of(&FieldId::new("BCF_Number")),
        Some(FieldKind::Control)
    );
}
