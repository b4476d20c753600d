//! flk-testkit
//!
//! Test doubles for driving sessions without a UI:
//! - [`Recorder`]: records every port call and answers confirmations from a script
//! - [`FixedClock`]: deterministic commit timestamps
//! - fixture forms used across scenario tests

use chrono::{DateTime, TimeZone, Utc};
use flk_engine::{RuleTrigger, TransitionEngine, TransitionRule};
use flk_fields::{FieldDef, FieldId, FieldKind, FieldRegistry, FocusTarget};
use flk_session::{Clock, Confirm, Focus, FormSpec, Notify, Ports};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortCall {
    Confirm { prompt: String, answer: bool },
    Notify(String),
    Focus(FocusTarget),
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<PortCall>,
    answers: VecDeque<bool>,
}

/// Shared recording port. Clones observe the same log.
///
/// Confirmations are answered from the scripted queue; once it is empty the
/// answer is "no".
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Rc<RefCell<Inner>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        let r = Self::new();
        r.inner.borrow_mut().answers.extend(answers);
        r
    }

    /// Queue more confirmation answers.
    pub fn will_answer(&self, answer: bool) {
        self.inner.borrow_mut().answers.push_back(answer);
    }

    /// Ports wired to this recorder with a [`FixedClock`] at [`fixed_now`].
    pub fn ports(&self) -> Ports {
        Ports::new(self.clone(), self.clone(), self.clone()).with_clock(FixedClock(fixed_now()))
    }

    pub fn calls(&self) -> Vec<PortCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn confirm_prompts(&self) -> Vec<String> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                PortCall::Confirm { prompt, .. } => Some(prompt.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                PortCall::Notify(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn focus_requests(&self) -> Vec<FocusTarget> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                PortCall::Focus(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().calls.clear();
    }
}

impl Confirm for Recorder {
    fn confirm(&mut self, prompt: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let answer = inner.answers.pop_front().unwrap_or(false);
        inner.calls.push(PortCall::Confirm {
            prompt: prompt.to_string(),
            answer,
        });
        answer
    }
}

impl Notify for Recorder {
    fn notify(&mut self, message: &str) {
        self.inner
            .borrow_mut()
            .calls
            .push(PortCall::Notify(message.to_string()));
    }
}

impl Focus for Recorder {
    fn focus(&mut self, target: &FocusTarget) {
        self.inner
            .borrow_mut()
            .calls
            .push(PortCall::Focus(target.clone()));
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Timestamp every [`Recorder::ports`] clock reports.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
        .single()
        .unwrap_or_default()
}

pub fn fid(s: &str) -> FieldId {
    FieldId::new(s)
}

// ---------------------------------------------------------------------------
// Fixture forms
// ---------------------------------------------------------------------------

/// Fields {A:"", B:""}: `UnlockA` unlocks A; changing A re-locks A and B.
pub fn two_field_form() -> FormSpec {
    let registry = FieldRegistry::new(vec![
        FieldDef::new("A", FieldKind::Text),
        FieldDef::new("B", FieldKind::Text),
    ])
    .expect("fixture registry is valid");

    let engine = TransitionEngine::new(
        vec![
            TransitionRule::on(RuleTrigger::Action("UnlockA".into()))
                .unlock(["A"])
                .focus_field("A")
                .notify("A unlocked."),
            TransitionRule::on(RuleTrigger::Action("UnlockB".into()))
                .unlock(["B"])
                .focus_field("B"),
            TransitionRule::on(RuleTrigger::Changed(fid("A")))
                .focus(FocusTarget::Commit)
                .lock(["A", "B"]),
            TransitionRule::on(RuleTrigger::CommitFocused).lock_all(),
        ],
        Vec::new(),
    );
    FormSpec::new("Two Fields", registry, engine)
}

/// The built-in proposal entry form.
pub fn proposal_form() -> FormSpec {
    flk_config::builtin_proposal_form()
        .and_then(|loaded| loaded.build())
        .expect("built-in form is valid")
}
