//! The scheduler capability set (spec.md §9): a tagged interface rather
//! than a deep class hierarchy. The reservation hooks default to a no-op
//! so that a `Server<S>` can dispatch to any `S: Scheduler` uniformly;
//! reservation-aware policies (`ReservationScheduler`) override them.

use crate::ids::{EntityId, JobId, ReservationId};
use crate::kernel::KernelContext;
use crate::resource_pool::ResourcePool;
use crate::workunit::{Reservation, Status, WorkUnit};

use super::error::SchedulerError;

/// Core job-lifecycle capability implemented by every scheduling policy.
pub trait Scheduler: std::fmt::Debug {
    /// A job has just arrived (submit time already stamped by the server).
    fn on_job_arrive(
        &mut self,
        pool: &mut ResourcePool,
        job: WorkUnit,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError>;

    /// The scheduler's own `TASK_START` fired for a previously reserved job.
    fn on_task_start(
        &mut self,
        pool: &mut ResourcePool,
        job_id: JobId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError>;

    /// The scheduler's own `TASK_COMPLETE` fired for a running job.
    fn on_job_complete(
        &mut self,
        pool: &mut ResourcePool,
        job_id: JobId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError>;

    /// The owner asked to cancel a waiting or running job.
    fn on_job_cancel(
        &mut self,
        pool: &mut ResourcePool,
        job_id: JobId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError>;

    /// A reservation was requested. No-op unless the policy is
    /// reservation-aware.
    fn on_reservation_request(
        &mut self,
        _pool: &mut ResourcePool,
        _reservation: Reservation,
        _self_id: EntityId,
        _ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        Ok(())
    }

    fn on_reservation_complete(
        &mut self,
        _pool: &mut ResourcePool,
        _reservation_id: ReservationId,
        _self_id: EntityId,
        _ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        Ok(())
    }

    fn on_reservation_cancel(
        &mut self,
        _pool: &mut ResourcePool,
        _reservation_id: ReservationId,
        _self_id: EntityId,
        _ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        Ok(())
    }

    /// Installs a work-unit status-change listener (spec.md §6's builder
    /// surface "listener for work-unit events"). No-op unless the policy
    /// forwards it to its own [`super::SchedulerCore`](s).
    fn set_listener(&mut self, _listener: Box<dyn FnMut(JobId, Status, Status)>) {}
}
