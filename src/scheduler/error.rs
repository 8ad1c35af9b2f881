use thiserror::Error;

use crate::ids::{JobId, ReservationId};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Pool(#[from] crate::resource_pool::ResourcePoolError),

    #[error(transparent)]
    Kernel(#[from] crate::kernel::KernelError),

    #[error("job {0} is not known to this scheduler")]
    UnknownJob(JobId),

    #[error("reservation {0} is not known to this scheduler")]
    UnknownReservation(ReservationId),
}
