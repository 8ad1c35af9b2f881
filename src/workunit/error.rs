use thiserror::Error;

use crate::ids::JobId;

use super::Status;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkUnitError {
    #[error("job {job} cannot move from {from:?} to {to:?}")]
    IllegalTransition { job: JobId, from: Status, to: Status },

    #[error("priority must be non-negative, got {0}")]
    InvalidPriority(i64),

    #[error("job {0} has no remaining work to schedule")]
    NoRemainingWork(JobId),
}
