//! flk-engine
//!
//! Transition Engine: maps a triggering action to a deterministic set of
//! lock-state changes, value mutations, and focus/notification effects.
//!
//! Architectural decisions:
//! - The action→effect mapping is a declarative rule table. Adding a trigger
//!   is a data change, not new control flow.
//! - Planning is pure: it works on copies and returns a [`Plan`]. The session
//!   swaps the planned state in, so a dispatch is never partially applied.
//! - Ids outside the registry are ignored wherever they appear in a rule.

mod engine;
mod rule;

pub use engine::{Plan, TransitionEngine};
pub use rule::{Guard, RuleTrigger, TransitionRule};
