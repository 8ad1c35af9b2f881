//! Crate-wide error umbrella. Internal APIs return their own focused error
//! type (`KernelError`, `SchedulerError`, ...); this type exists for driver
//! code (the `demos/` programs, integration tests) that wants one `Result`
//! to propagate through `?` regardless of which subsystem failed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterSimError {
    #[error(transparent)]
    Range(#[from] crate::range::RangeError),

    #[error(transparent)]
    Profile(#[from] crate::profile::ProfileError),

    #[error(transparent)]
    Pool(#[from] crate::resource_pool::ResourcePoolError),

    #[error(transparent)]
    Kernel(#[from] crate::kernel::KernelError),

    #[error(transparent)]
    WorkUnit(#[from] crate::workunit::WorkUnitError),

    #[error(transparent)]
    Scheduler(#[from] crate::scheduler::SchedulerError),

    #[error(transparent)]
    Server(#[from] crate::server::ServerError),

    #[error(transparent)]
    Workload(#[from] crate::workload::WorkloadError),

    #[error(transparent)]
    Calendar(#[from] crate::availability_calendar::CalendarError),
}
