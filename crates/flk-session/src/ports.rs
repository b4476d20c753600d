//! Capability ports the session calls into.
//!
//! The core never touches a rendering surface. A UI collaborator (or a test
//! double) implements these and is injected at session open.

use chrono::{DateTime, Utc};
use flk_fields::FocusTarget;
use std::cell::RefCell;
use std::rc::Rc;

/// Blocking yes/no gate. Called before the mutation phase of a dispatch.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Fire-and-forget user feedback.
pub trait Notify {
    fn notify(&mut self, message: &str);
}

/// Input focus transfer request.
pub trait Focus {
    fn focus(&mut self, target: &FocusTarget);
}

/// Source of commit timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<T: Confirm + ?Sized> Confirm for Rc<RefCell<T>> {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.borrow_mut().confirm(prompt)
    }
}

impl<T: Notify + ?Sized> Notify for Rc<RefCell<T>> {
    fn notify(&mut self, message: &str) {
        self.borrow_mut().notify(message)
    }
}

impl<T: Focus + ?Sized> Focus for Rc<RefCell<T>> {
    fn focus(&mut self, target: &FocusTarget) {
        self.borrow_mut().focus(target)
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Answers every confirmation with "no".
pub struct Decline;

impl Confirm for Decline {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}

/// Drops notifications and focus requests.
pub struct Discard;

impl Notify for Discard {
    fn notify(&mut self, _message: &str) {}
}

impl Focus for Discard {
    fn focus(&mut self, _target: &FocusTarget) {}
}

pub struct Ports {
    pub confirm: Box<dyn Confirm>,
    pub notify: Box<dyn Notify>,
    pub focus: Box<dyn Focus>,
    pub clock: Box<dyn Clock>,
}

impl Ports {
    pub fn new(
        confirm: impl Confirm + 'static,
        notify: impl Notify + 'static,
        focus: impl Focus + 'static,
    ) -> Self {
        Self {
            confirm: Box::new(confirm),
            notify: Box::new(notify),
            focus: Box::new(focus),
            clock: Box::new(SystemClock),
        }
    }

    /// No UI attached: confirmations decline, feedback is dropped.
    pub fn headless() -> Self {
        Self::new(Decline, Discard, Discard)
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}
