//! Scenario: declarative rule table
//!
//! # Invariants under test
//!
//! 1. Unlock rule: field unlocked, focus moves to it, notification emitted.
//! 2. After-update rule: focus commit, field and dependent re-locked.
//! 3. Derived-default rule fires only when its guard holds.
//! 4. `Unlocked` guard: a locked control cannot be "clicked".
//! 5. `lock_all` re-evaluates the conditional exception on the values the
//!    same dispatch just wrote.
//! 6. Unknown ids inside a rule are ignored; no matching rule → `None`.
//! 7. Planning never mutates the inputs.
//! 8. Several rules on one trigger: lock deltas accumulate; focus,
//!    notification and dialog come from the last rule that sets them.

use flk_engine::*;
use flk_fields::{FieldDef, FieldId, FieldKind, FieldRegistry, FocusTarget};
use flk_state::{ConditionalUnlock, LockState, Snapshot};

fn registry() -> FieldRegistry {
    FieldRegistry::new(vec![
        FieldDef::new("Prefix", FieldKind::Choice).with_default("BCF"),
        FieldDef::new("A", FieldKind::Text),
        FieldDef::new("B", FieldKind::Text),
        FieldDef::new("Temp", FieldKind::Text),
        FieldDef::new("Ctl", FieldKind::Control),
    ])
    .unwrap()
}

fn engine() -> TransitionEngine {
    TransitionEngine::new(
        vec![
            TransitionRule::on(RuleTrigger::Action("UnlockA".into()))
                .unlock(["A"])
                .focus_field("A")
                .notify("A unlocked."),
            TransitionRule::on(RuleTrigger::Changed(FieldId::new("A")))
                .focus(FocusTarget::Commit)
                .lock(["A", "B"]),
            TransitionRule::on(RuleTrigger::Action("Ctl".into()))
                .when(Guard::Unlocked {
                    unlocked: FieldId::new("Ctl"),
                })
                .unlock(["B", "Temp"])
                .focus_field("B"),
            TransitionRule::on(RuleTrigger::Changed(FieldId::new("B")))
                .when(Guard::ValueEquals {
                    field: FieldId::new("Prefix"),
                    equals: "BCF".into(),
                })
                .set("Temp", "N/A")
                .focus(FocusTarget::Commit),
            TransitionRule::on(RuleTrigger::Changed(FieldId::new("Prefix"))).lock_all(),
            TransitionRule::on(RuleTrigger::Action("Reset".into()))
                .set("Prefix", "OTHER")
                .lock_all(),
            TransitionRule::on(RuleTrigger::Action("Ghostly".into()))
                .unlock(["Ghost"])
                .set("Ghost", "x"),
        ],
        vec![ConditionalUnlock {
            control: FieldId::new("Ctl"),
            when_field: FieldId::new("Prefix"),
            equals: "BCF".into(),
        }],
    )
}

fn resting(reg: &FieldRegistry, eng: &TransitionEngine, values: &Snapshot) -> LockState {
    let mut ls = LockState::all_locked(reg);
    eng.rest(&mut ls, values);
    ls
}

#[test]
fn unlock_then_confirm_relocks_and_focuses_commit() {
    let reg = registry();
    let eng = engine();
    let values = Snapshot::from_values(&reg, reg.defaults());
    let lock = resting(&reg, &eng, &values);

    let p = eng
        .plan(&RuleTrigger::Action("UnlockA".into()), &lock, &values)
        .expect("rule matches");
    assert!(!p.lock.is_locked(&FieldId::new("A")));
    assert_eq!(p.focus, Some(FocusTarget::Field(FieldId::new("A"))));
    assert_eq!(p.notify.as_deref(), Some("A unlocked."));
    assert_eq!(p.rules_applied, 1);

    let mut edited = p.values.clone();
    edited.set(&FieldId::new("A"), "v1");
    let mut lock2 = p.lock.clone();
    lock2.set_locked(&FieldId::new("B"), false);

    let p2 = eng
        .plan(&RuleTrigger::Changed(FieldId::new("A")), &lock2, &edited)
        .unwrap();
    assert!(p2.lock.is_locked(&FieldId::new("A")));
    assert!(p2.lock.is_locked(&FieldId::new("B")));
    assert_eq!(p2.focus, Some(FocusTarget::Commit));
    assert_eq!(p2.notify, None);
}

#[test]
fn locked_control_cannot_be_clicked() {
    let reg = registry();
    let eng = engine();
    let mut values = Snapshot::from_values(&reg, reg.defaults());
    values.set(&FieldId::new("Prefix"), "OTHER");
    let lock = resting(&reg, &eng, &values);
    assert!(lock.is_locked(&FieldId::new("Ctl")));

    assert!(eng
        .plan(&RuleTrigger::Action("Ctl".into()), &lock, &values)
        .is_none());
}

#[test]
fn unlocked_control_click_unlocks_pair() {
    let reg = registry();
    let eng = engine();
    let values = Snapshot::from_values(&reg, reg.defaults());
    let lock = resting(&reg, &eng, &values);

    let p = eng
        .plan(&RuleTrigger::Action("Ctl".into()), &lock, &values)
        .unwrap();
    assert!(!p.lock.is_locked(&FieldId::new("B")));
    assert!(!p.lock.is_locked(&FieldId::new("Temp")));
    assert_eq!(p.focus, Some(FocusTarget::Field(FieldId::new("B"))));
}

#[test]
fn derived_default_only_when_guard_holds() {
    let reg = registry();
    let eng = engine();
    let values = Snapshot::from_values(&reg, reg.defaults());
    let lock = resting(&reg, &eng, &values);

    let p = eng
        .plan(&RuleTrigger::Changed(FieldId::new("B")), &lock, &values)
        .unwrap();
    assert_eq!(p.values.get(&FieldId::new("Temp")), Some("N/A"));
    assert_eq!(p.focus, Some(FocusTarget::Commit));

    let mut other = values.clone();
    other.set(&FieldId::new("Prefix"), "OTHER");
    assert!(eng
        .plan(&RuleTrigger::Changed(FieldId::new("B")), &lock, &other)
        .is_none());
}

#[test]
fn lock_all_sees_values_written_in_same_rule() {
    let reg = registry();
    let eng = engine();
    let values = Snapshot::from_values(&reg, reg.defaults());
    let lock = resting(&reg, &eng, &values);
    assert!(!lock.is_locked(&FieldId::new("Ctl")));

    let p = eng
        .plan(&RuleTrigger::Action("Reset".into()), &lock, &values)
        .unwrap();
    assert!(
        p.lock.is_locked(&FieldId::new("Ctl")),
        "prefix written to OTHER must re-lock the conditional control"
    );
}

#[test]
fn unknown_ids_in_rules_are_ignored() {
    let reg = registry();
    let eng = engine();
    let values = Snapshot::from_values(&reg, reg.defaults());
    let lock = resting(&reg, &eng, &values);

    let p = eng
        .plan(&RuleTrigger::Action("Ghostly".into()), &lock, &values)
        .expect("rule matched even though its ids are unknown");
    assert_eq!(p.lock, lock);
    assert_eq!(p.values, values);
}

#[test]
fn no_rule_means_no_plan_and_inputs_untouched() {
    let reg = registry();
    let eng = engine();
    let values = Snapshot::from_values(&reg, reg.defaults());
    let lock = resting(&reg, &eng, &values);
    let (lock_before, values_before) = (lock.clone(), values.clone());

    assert!(eng
        .plan(&RuleTrigger::Action("Nope".into()), &lock, &values)
        .is_none());
    let _ = eng.plan(&RuleTrigger::Action("UnlockA".into()), &lock, &values);
    assert_eq!(lock, lock_before);
    assert_eq!(values, values_before);
}

#[test]
fn referenced_fields_include_conditional_pair() {
    let eng = engine();
    let refs = eng.referenced_fields();
    for id in ["A", "B", "Temp", "Prefix", "Ctl", "Ghost"] {
        assert!(refs.contains(&FieldId::new(id)), "missing {id}");
    }
}

#[test]
fn later_rules_win_focus_notify_and_dialog() {
    let reg = registry();
    let eng = TransitionEngine::new(
        vec![
            TransitionRule::on(RuleTrigger::Action("Done".into()))
                .unlock(["A"])
                .focus_field("A")
                .notify("first")
                .dialog("Draft Dialog"),
            TransitionRule::on(RuleTrigger::Action("Done".into()))
                .unlock(["B"])
                .notify("second")
                .dialog("Date Completed"),
        ],
        Vec::new(),
    );
    let values = Snapshot::from_values(&reg, reg.defaults());
    let lock = LockState::all_locked(&reg);

    let plan = eng
        .plan(&RuleTrigger::Action("Done".into()), &lock, &values)
        .expect("both rules match");
    assert_eq!(plan.rules_applied, 2);
    assert!(!plan.lock.is_locked(&FieldId::new("A")));
    assert!(!plan.lock.is_locked(&FieldId::new("B")));
    assert_eq!(plan.focus, Some(FocusTarget::Field(FieldId::new("A"))));
    assert_eq!(plan.notify.as_deref(), Some("second"));
    assert_eq!(plan.dialog.as_deref(), Some("Date Completed"));
}
