use thiserror::Error;

use crate::ids::EntityId;

/// Errors from the discrete-event kernel. Every variant here is a usage or
/// dispatch error in the spec's taxonomy (spec.md §7): unrecoverable, and
/// the driving program is expected to treat them as fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("event delay must be >= 0, got {0}")]
    NegativeDelay(i64),

    #[error("event scheduled for the past: clock is at {now}, event requested at {requested}")]
    ScheduledForThePast { now: i64, requested: i64 },

    #[error("no entity registered for destination {0}")]
    UnknownEntity(EntityId),

    #[error("cannot reset the simulation while it is running")]
    ResetWhileRunning,

    #[error("simulation time span must be positive, got {0}")]
    InvalidSpan(i64),
}
