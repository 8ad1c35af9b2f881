use thiserror::Error;

use crate::range::RangeList;

/// Errors that can occur while mutating an availability profile.
///
/// Every variant here corresponds to a "usage error" in the spec's error
/// taxonomy: they are programmer errors (a scheduler allocating without
/// first confirming feasibility) and are never expected to occur when a
/// scheduler obeys its own contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("ranges {ranges} are not free at time {at}")]
    NotFree { ranges: RangeList, at: i64 },

    #[error("allocation window start {start} must be < finish {finish}")]
    EmptyWindow { start: i64, finish: i64 },

    #[error("capacity must be positive, got {0}")]
    InvalidCapacity(i64),
}
