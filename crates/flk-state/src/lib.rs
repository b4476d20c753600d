//! flk-state
//!
//! Lock-State Store and Snapshot Store.
//!
//! Both stores are registry-complete: every field id on the form has exactly
//! one entry, and ids outside the registry are never present. Operations
//! that name an unknown id are no-ops.
//!
//! Pure deterministic logic. No IO, no wall-clock. The session passes the
//! commit timestamp in.

mod lock;
mod snapshot;

pub use lock::{resting_exceptions, ConditionalUnlock, LockChange, LockState};
pub use snapshot::{Snapshot, SnapshotStore, ValueChange};
