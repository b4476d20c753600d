//! Session controller.
//!
//! # Invariants
//!
//! - **Atomic dispatch**: every trigger is planned on copies; the session
//!   adopts the new lock-state and values in one step, or not at all.
//! - **Confirm before mutate**: undo/quit ask their confirmation before the
//!   mutation phase. A declined confirmation leaves the session untouched.
//! - **Commit returns to rest**: after `Commit`, every field is locked except
//!   the (re-evaluated) conditional exceptions, and the form is clean.
//! - **Undo while clean is a terminal no-op**: feedback only, never a prompt.
//! - **Closed is terminal**: after quit, every trigger is ignored.

use chrono::{DateTime, Utc};
use flk_engine::{Plan, RuleTrigger};
use flk_fields::{FieldId, FieldKind};
use flk_state::{LockState, Snapshot, SnapshotStore};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::{Effects, FormSpec, Outcome, Ports, Trigger};

pub struct Session {
    id: Uuid,
    form: FormSpec,
    lock: LockState,
    snaps: SnapshotStore,
    open: bool,
    ports: Ports,
}

impl Session {
    /// Open the form with its registry defaults as the rendered values.
    pub fn open(form: FormSpec, ports: Ports) -> Self {
        let defaults = form.registry.defaults();
        Self::open_with(form, defaults, ports)
    }

    /// Open the form with `values` overriding the defaults (unknown ids dropped).
    pub fn open_with<I>(form: FormSpec, values: I, ports: Ports) -> Self
    where
        I: IntoIterator<Item = (FieldId, String)>,
    {
        let mut seeded = form.registry.defaults();
        for (id, v) in values {
            match form.registry.kind_of(&id) {
                Some(FieldKind::Control) | None => {
                    warn!(field = %id, "initial value ignored: not a value-bearing field")
                }
                Some(_) => {
                    seeded.insert(id, v);
                }
            }
        }
        for def in form.registry.defs() {
            if def.kind == FieldKind::Control {
                seeded.insert(def.id.clone(), String::new());
            }
        }

        let initial = Snapshot::from_values(&form.registry, seeded);
        let mut session = Self {
            id: Uuid::new_v4(),
            lock: LockState::all_locked(&form.registry),
            snaps: SnapshotStore::new(initial),
            open: true,
            form,
            ports,
        };
        session.dispatch(Trigger::Open);
        session
    }

    /// Apply one trigger and return what happened.
    pub fn dispatch(&mut self, trigger: Trigger) -> Effects {
        let span = info_span!("dispatch", session = %self.id, %trigger);
        let _guard = span.enter();

        if !self.open {
            debug!("session closed; trigger ignored");
            let mut fx = Effects::new(&trigger, Outcome::SessionClosed);
            fx.dirty = self.is_dirty();
            return fx;
        }

        let lock_before = self.lock.clone();
        let values_before = self.snaps.current().clone();

        let mut fx = match &trigger {
            Trigger::Open => self.reopen(&trigger),
            Trigger::Action(name) => self.run_rules(&trigger, RuleTrigger::Action(name.clone())),
            Trigger::Change { field, value } => self.change(&trigger, field, value),
            Trigger::FocusCommit => self.run_rules(&trigger, RuleTrigger::CommitFocused),
            Trigger::Commit => self.commit(&trigger),
            Trigger::Undo => self.undo(&trigger),
            Trigger::Quit => self.quit(&trigger),
            Trigger::Help => Effects::new(&trigger, Outcome::Applied).notify(&self.form.messages.help),
        };

        fx.lock_changes = self.lock.changes_from(&lock_before);
        fx.value_changes = self.snaps.current().changes_from(&values_before);
        fx.dirty = self.is_dirty();
        self.deliver(&fx);
        fx
    }

    /// Fold a raw (keystroke-level) value update. No rules fire.
    ///
    /// Returns `false` when the id is not a value-bearing field on this form
    /// or the session is closed.
    pub fn input(&mut self, field: &FieldId, value: impl Into<String>) -> bool {
        if !self.open || !self.accepts_value(field) {
            return false;
        }
        if self.lock.is_locked(field) {
            debug!(%field, "value folded into a locked field");
        }
        self.snaps.current_mut().set(field, value);
        true
    }

    // -----------------------------------------------------------------------
    // Trigger handlers
    // -----------------------------------------------------------------------

    fn reopen(&mut self, trigger: &Trigger) -> Effects {
        self.rest();
        self.snaps.reset();
        info!(form = %self.form.name, "form opened");
        Effects::new(trigger, Outcome::Applied)
    }

    fn run_rules(&mut self, trigger: &Trigger, rule_trigger: RuleTrigger) -> Effects {
        match self
            .form
            .engine
            .plan(&rule_trigger, &self.lock, self.snaps.current())
        {
            Some(plan) => self.adopt(trigger, plan),
            None => {
                debug!(%rule_trigger, "no rule");
                Effects::new(trigger, Outcome::NoRule)
            }
        }
    }

    fn change(&mut self, trigger: &Trigger, field: &FieldId, value: &str) -> Effects {
        if !self.accepts_value(field) {
            return Effects::new(trigger, Outcome::UnknownField);
        }

        let mut values = self.snaps.current().clone();
        values.set(field, value);

        match self
            .form
            .engine
            .plan(&RuleTrigger::Changed(field.clone()), &self.lock, &values)
        {
            Some(plan) => self.adopt(trigger, plan),
            None => {
                self.snaps.replace_current(values);
                Effects::new(trigger, Outcome::Applied)
            }
        }
    }

    fn commit(&mut self, trigger: &Trigger) -> Effects {
        self.rest();
        let at = self.ports.clock.now();
        self.snaps.commit(at);
        info!(committed_at = %at, "committed");
        Effects::new(trigger, Outcome::Applied).notify(&self.form.messages.saved)
    }

    fn undo(&mut self, trigger: &Trigger) -> Effects {
        if !self.is_dirty() {
            return Effects::new(trigger, Outcome::NothingToUndo)
                .notify(&self.form.messages.nothing_to_undo);
        }

        let prompt = self.form.messages.undo_prompt.clone();
        if !self.ports.confirm.confirm(&prompt) {
            debug!("undo declined");
            return Effects::new(trigger, Outcome::Declined).confirmed(&prompt, false);
        }

        self.snaps.revert();
        self.rest();
        info!("reverted to last saved state");
        Effects::new(trigger, Outcome::Applied)
            .confirmed(&prompt, true)
            .notify(&self.form.messages.reverted)
    }

    fn quit(&mut self, trigger: &Trigger) -> Effects {
        let mut fx = Effects::new(trigger, Outcome::Closed);
        if self.is_dirty() {
            let prompt = self.form.messages.quit_prompt.clone();
            let accepted = self.ports.confirm.confirm(&prompt);
            if !accepted {
                debug!("quit declined");
                return Effects::new(trigger, Outcome::Declined).confirmed(&prompt, false);
            }
            fx = fx.confirmed(&prompt, true);
        }

        self.open = false;
        info!(dirty = self.is_dirty(), "session closed");
        fx.notify(&self.form.messages.quit)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn adopt(&mut self, trigger: &Trigger, mut plan: Plan) -> Effects {
        for def in self.form.registry.defs() {
            if def.kind == FieldKind::Control && plan.values.set(&def.id, "") {
                warn!(field = %def.id, "rule value ignored: controls carry no value");
            }
        }
        self.lock = plan.lock;
        self.snaps.replace_current(plan.values);
        let mut fx = Effects::new(trigger, Outcome::Applied);
        fx.focus = plan.focus;
        fx.notification = plan.notify;
        fx.dialog = plan.dialog;
        fx
    }

    fn rest(&mut self) {
        self.form.engine.rest(&mut self.lock, self.snaps.current());
    }

    fn accepts_value(&self, field: &FieldId) -> bool {
        match self.form.registry.kind_of(field) {
            Some(FieldKind::Control) | None => {
                warn!(%field, "ignored: not a value-bearing field on this form");
                false
            }
            Some(_) => true,
        }
    }

    fn deliver(&mut self, fx: &Effects) {
        if let Some(target) = &fx.focus {
            self.ports.focus.focus(target);
        }
        if let Some(msg) = &fx.notification {
            self.ports.notify.notify(msg);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.snaps.is_dirty()
    }

    pub fn last_committed_at(&self) -> Option<DateTime<Utc>> {
        self.snaps.committed_at()
    }

    pub fn is_locked(&self, field: &FieldId) -> bool {
        self.lock.is_locked(field)
    }

    pub fn value(&self, field: &FieldId) -> Option<&str> {
        self.snaps.current().get(field)
    }

    pub fn lock_state(&self) -> &LockState {
        &self.lock
    }

    pub fn current(&self) -> &Snapshot {
        self.snaps.current()
    }

    pub fn saved(&self) -> &Snapshot {
        self.snaps.saved()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn session_id(&self) -> Uuid {
        self.id
    }

    pub fn form(&self) -> &FormSpec {
        &self.form
    }

    pub fn form_name(&self) -> &str {
        &self.form.name
    }
}
