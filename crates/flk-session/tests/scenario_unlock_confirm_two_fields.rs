//! Scenario A: unlock → edit → confirm on a two-field form
//!
//! # Invariants under test
//!
//! 1. `UnlockA` unlocks A, requests focus on A, emits a notification.
//! 2. Editing A makes the form dirty.
//! 3. After-update of A re-locks A and the dependent B, focus → commit.
//! 4. Changing a field and changing it back makes the form clean again.
//! 5. Triggers with no rule report `NoRule` and mutate nothing.

use flk_fields::FocusTarget;
use flk_session::*;
use flk_testkit::{fid, two_field_form, Recorder};

#[test]
fn unlock_edit_confirm_sequence() {
    let rec = Recorder::new();
    let mut s = Session::open(two_field_form(), rec.ports());
    assert!(s.is_locked(&fid("A")));
    assert!(s.is_locked(&fid("B")));

    let fx = s.dispatch(Trigger::action("UnlockA"));
    assert_eq!(fx.outcome, Outcome::Applied);
    assert!(!s.is_locked(&fid("A")));
    assert_eq!(fx.focus, Some(FocusTarget::Field(fid("A"))));
    assert_eq!(fx.notification.as_deref(), Some("A unlocked."));
    assert_eq!(rec.focus_requests(), vec![FocusTarget::Field(fid("A"))]);
    assert_eq!(rec.notifications(), vec!["A unlocked.".to_string()]);

    s.dispatch(Trigger::action("UnlockB"));
    assert!(!s.is_locked(&fid("B")));

    assert!(s.input(&fid("A"), "v1"));
    assert!(s.is_dirty());

    let fx = s.dispatch(Trigger::change("A", "v1"));
    assert_eq!(fx.outcome, Outcome::Applied);
    assert!(s.is_locked(&fid("A")));
    assert!(s.is_locked(&fid("B")));
    assert_eq!(fx.focus, Some(FocusTarget::Commit));
    assert!(fx.dirty);
    assert_eq!(s.value(&fid("A")), Some("v1"));
}

#[test]
fn change_then_change_back_is_clean() {
    let mut s = Session::open(two_field_form(), Ports::headless());

    s.dispatch(Trigger::change("B", "tmp"));
    assert!(s.is_dirty());
    s.dispatch(Trigger::change("B", ""));
    assert!(!s.is_dirty());

    s.input(&fid("A"), "x");
    s.input(&fid("A"), "");
    assert!(!s.is_dirty());
}

#[test]
fn change_without_rule_still_folds_value() {
    let mut s = Session::open(two_field_form(), Ports::headless());
    let fx = s.dispatch(Trigger::change("B", "hello"));
    assert_eq!(fx.outcome, Outcome::Applied);
    assert_eq!(fx.value_changes.len(), 1);
    assert!(fx.lock_changes.is_empty());
    assert_eq!(fx.focus, None);
}

#[test]
fn unknown_action_is_no_rule() {
    let rec = Recorder::new();
    let mut s = Session::open(two_field_form(), rec.ports());
    let before = s.lock_state().clone();

    let fx = s.dispatch(Trigger::action("DoesNotExist"));
    assert_eq!(fx.outcome, Outcome::NoRule);
    assert!(!fx.mutated());
    assert_eq!(s.lock_state(), &before);
    assert!(rec.calls().is_empty());
}

#[test]
fn unknown_field_edits_are_ignored() {
    let mut s = Session::open(two_field_form(), Ports::headless());
    let snap = s.current().clone();

    let fx = s.dispatch(Trigger::change("Ghost", "x"));
    assert_eq!(fx.outcome, Outcome::UnknownField);
    assert!(!fx.mutated());
    assert!(!s.input(&fid("Ghost"), "x"));
    assert_eq!(s.current(), &snap);
    assert!(!s.is_dirty());
}
