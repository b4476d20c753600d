//! Single-slot toast with a self-resetting timer.
//!
//! Showing a message replaces the visible one and restarts the timer, so a
//! repeated notification stays up for a full TTL after its latest showing.

use std::time::{Duration, Instant};

use crate::{FormSpec, Notify};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug, Clone)]
pub struct ToastBoard {
    ttl: Duration,
    current: Option<Toast>,
    shown: u64,
}

impl ToastBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: None,
            shown: 0,
        }
    }

    pub fn for_form(form: &FormSpec) -> Self {
        Self::new(form.toast_ttl)
    }

    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some(Toast {
            message: message.into(),
            shown_at: now,
        });
        self.shown += 1;
    }

    /// The message on screen at `now`, if its timer has not run out.
    pub fn visible(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|t| now.saturating_duration_since(t.shown_at) < self.ttl)
            .map(|t| t.message.as_str())
    }

    /// Total messages shown since creation.
    pub fn shown(&self) -> u64 {
        self.shown
    }
}

impl Notify for ToastBoard {
    fn notify(&mut self, message: &str) {
        self.show(message, Instant::now());
    }
}
