//! flk-session
//!
//! Session Controller for one open form.
//!
//! Responsibilities:
//! - Session open: initial lock-down, saved := current
//! - `dispatch`: the single entry point for every named trigger
//! - Commit / undo / quit, with confirmations gated before any mutation
//! - Delivering focus and notifications to injected capability ports
//!
//! Single-threaded and synchronous: one trigger is dispatched at a time, and
//! a confirmation is a blocking yes/no call made before the mutation phase.

mod controller;
mod effects;
mod form;
mod ports;
mod toast;

pub use controller::Session;
pub use effects::{ConfirmationRecord, Effects, Outcome, Trigger};
pub use form::{FormSpec, Messages, DEFAULT_TOAST_TTL_MS};
pub use ports::{Clock, Confirm, Decline, Discard, Focus, Notify, Ports, SystemClock};
pub use toast::{Toast, ToastBoard};
