//! FCFS by default (spec.md §4.5.1): try to start on arrival, else enqueue;
//! on completion or cancellation, drain the waiting queue from the head
//! until the first failure to start.

use crate::ids::{EntityId, JobId};
use crate::kernel::{EventKind, KernelContext, Payload};
use crate::resource_pool::ResourcePool;
use crate::workunit::{Status, WorkUnit};

use super::core::{send_job_to_owner, start_job, SchedulerCore};
use super::error::SchedulerError;
use super::policy::Scheduler;

#[derive(Debug)]
pub struct DefaultScheduler {
    core: SchedulerCore,
}

impl DefaultScheduler {
    pub fn new() -> Self {
        Self {
            core: SchedulerCore::new(),
        }
    }

    pub fn core(&self) -> &SchedulerCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut SchedulerCore {
        &mut self.core
    }

    fn start_waiting_jobs(
        &mut self,
        pool: &mut ResourcePool,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        loop {
            let Some(mut job) = self.core.waiting.first().cloned() else {
                break;
            };
            if start_job(&mut self.core, pool, &mut job, self_id, ctx)? {
                self.core.remove_from_waiting(job.id);
                self.core.running.push(job);
            } else {
                break;
            }
        }
        Ok(())
    }
}

impl Default for DefaultScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for DefaultScheduler {
    fn on_job_arrive(
        &mut self,
        pool: &mut ResourcePool,
        mut job: WorkUnit,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let now = ctx.now();
        self.core.transition(&mut job, Status::Enqueued, now);
        if start_job(&mut self.core, pool, &mut job, self_id, ctx)? {
            self.core.running.push(job);
        } else {
            self.core.transition(&mut job, Status::Waiting, now);
            self.core.enqueue_waiting(job);
        }
        Ok(())
    }

    fn on_task_start(
        &mut self,
        _pool: &mut ResourcePool,
        _job_id: JobId,
        _self_id: EntityId,
        _ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        Ok(())
    }

    fn on_job_complete(
        &mut self,
        pool: &mut ResourcePool,
        job_id: JobId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let Some(mut job) = self.core.remove_from_running(job_id) else {
            return Err(SchedulerError::UnknownJob(job_id));
        };
        self.core.transition(&mut job, Status::Complete, ctx.now());
        let ranges = job.assigned.clone();
        let (start, finish) = job
            .activities
            .last()
            .map(|a| (a.start, a.finish))
            .unwrap_or((ctx.now(), ctx.now()));
        pool.release(&ranges, start, finish)?;
        send_job_to_owner(&job, self_id, ctx)?;
        self.start_waiting_jobs(pool, self_id, ctx)?;
        Ok(())
    }

    fn on_job_cancel(
        &mut self,
        pool: &mut ResourcePool,
        job_id: JobId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let now = ctx.now();
        if let Some(mut job) = self.core.remove_from_waiting(job_id) {
            self.core.transition(&mut job, Status::Cancelled, now);
            send_job_to_owner(&job, self_id, ctx)?;
            return Ok(());
        }
        let Some(mut job) = self.core.remove_from_running(job_id) else {
            return Err(SchedulerError::UnknownJob(job_id));
        };
        self.core.transition(&mut job, Status::Cancelled, now);
        ctx.cancel_future_events(|event| {
            event.kind == EventKind::TaskComplete && event.payload == Payload::Job(job_id)
        });
        let ranges = job.assigned.clone();
        if let Some(activity) = job.activities.last() {
            pool.release(&ranges, activity.start, now.max(activity.finish))?;
        }
        send_job_to_owner(&job, self_id, ctx)?;
        self.start_waiting_jobs(pool, self_id, ctx)?;
        Ok(())
    }

    fn set_listener(&mut self, listener: Box<dyn FnMut(JobId, Status, Status)>) {
        self.core.set_listener(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntityId;

    #[test]
    fn fresh_scheduler_has_empty_queues() {
        let scheduler = DefaultScheduler::new();
        assert!(scheduler.core().waiting.is_empty());
        assert!(scheduler.core().running.is_empty());
    }

    #[test]
    fn enqueue_waiting_keeps_fifo_order() {
        let mut core = SchedulerCore::new();
        let owner = EntityId::new(1);
        core.enqueue_waiting(WorkUnit::new(JobId::new(2), owner, 10, 50, 1, 0));
        core.enqueue_waiting(WorkUnit::new(JobId::new(1), owner, 5, 50, 1, 0));
        assert_eq!(core.waiting[0].id, JobId::new(1));
        assert_eq!(core.waiting[1].id, JobId::new(2));
    }
}
