//! Aggressive (EASY) backfilling (spec.md §4.5.4): only the head-of-queue
//! "pivot" holds an advance reservation; every other waiting job is
//! retried for an immediate start only, never delaying the pivot.
//!
//! The pivot's reservation is carried in the profile itself (allocated at
//! its recorded start the moment it becomes the pivot), so an immediate-
//! start feasibility check at the current time automatically respects the
//! pivot's barrier — this is the fix for the open question in spec.md §9:
//! the barrier is the pivot's *recorded* allocation, not a fresh
//! `findStartTime` re-query on a job already pulled out of `waiting`.

use crate::ids::{EntityId, JobId};
use crate::kernel::{EventKind, KernelContext, Payload};
use crate::resource_pool::ResourcePool;
use crate::workunit::{Status, WorkUnit};

use super::core::{allocate_resources_to_job, send_job_to_owner, start_job, SchedulerCore};
use super::error::SchedulerError;
use super::policy::Scheduler;

#[derive(Debug)]
pub struct AggressiveScheduler {
    core: SchedulerCore,
    pivot: Option<JobId>,
}

impl AggressiveScheduler {
    pub fn new() -> Self {
        Self {
            core: SchedulerCore::new(),
            pivot: None,
        }
    }

    pub fn core(&self) -> &SchedulerCore {
        &self.core
    }

    pub fn pivot(&self) -> Option<JobId> {
        self.pivot
    }

    fn promote_pivot(
        &mut self,
        pool: &mut ResourcePool,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        if self.pivot.is_some() {
            return Ok(());
        }
        let Some(idx) = self.core.waiting.first().map(|_| 0usize) else {
            return Ok(());
        };
        let mut candidate = self.core.waiting[idx].clone();
        let now = ctx.now();
        let Some(start) = pool.find_start_time(candidate.n_resources as i64, now, candidate.remaining_work)
        else {
            return Ok(());
        };
        let free = pool
            .check_availability_window(candidate.n_resources as i64, start, candidate.remaining_work, false)
            .expect("find_start_time guarantees feasibility");
        let ranges = free
            .select_resources(candidate.n_resources as i64)
            .expect("feasibility check guarantees enough indices");
        allocate_resources_to_job(&mut self.core, pool, &mut candidate, start, &ranges, self_id, ctx)?;
        self.pivot = Some(candidate.id);
        self.core.waiting[idx] = candidate;
        Ok(())
    }

    /// Retries every non-pivot waiting job for an immediate start, then (if
    /// there is no pivot) promotes the head of the queue to pivot.
    fn re_evaluate(
        &mut self,
        pool: &mut ResourcePool,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        loop {
            let ids: Vec<JobId> = self
                .core
                .waiting
                .iter()
                .filter(|j| Some(j.id) != self.pivot)
                .map(|j| j.id)
                .collect();
            let mut started = false;
            for id in ids {
                let Some(idx) = self.core.waiting.iter().position(|j| j.id == id) else {
                    continue;
                };
                let mut job = self.core.waiting[idx].clone();
                if start_job(&mut self.core, pool, &mut job, self_id, ctx)? {
                    self.core.waiting.remove(idx);
                    self.core.running.push(job);
                    started = true;
                    break;
                }
            }
            if !started {
                break;
            }
        }
        self.promote_pivot(pool, self_id, ctx)
    }
}

impl Default for AggressiveScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for AggressiveScheduler {
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
            return Ok(());
        }
        self.core.transition(&mut job, Status::Waiting, now);
        self.core.enqueue_waiting(job);
        self.promote_pivot(pool, self_id, ctx)
    }

    fn on_task_start(
        &mut self,
        _pool: &mut ResourcePool,
        job_id: JobId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let Some(idx) = self.core.waiting.iter().position(|j| j.id == job_id) else {
            return Err(SchedulerError::UnknownJob(job_id));
        };
        let mut job = self.core.waiting.remove(idx);
        let now = ctx.now();
        self.core.transition(&mut job, Status::InExecution, now);
        ctx.send(self_id, self_id, job.remaining_work, EventKind::TaskComplete, Payload::Job(job.id))?;
        self.core.running.push(job);
        if self.pivot == Some(job_id) {
            self.pivot = None;
        }
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
        self.re_evaluate(pool, self_id, ctx)
    }

    fn on_job_cancel(
        &mut self,
        pool: &mut ResourcePool,
        job_id: JobId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let now = ctx.now();
        if self.core.waiting.iter().any(|j| j.id == job_id) {
            let mut job = self.core.remove_from_waiting(job_id).unwrap();
            if self.pivot == Some(job_id) {
                let ranges = job.assigned.clone();
                if let Some(activity) = job.activities.last() {
                    pool.release(&ranges, activity.start, activity.finish)?;
                }
                ctx.cancel_next_future_event(|event| event.kind == EventKind::TaskStart && event.payload == Payload::Job(job_id));
                self.pivot = None;
            }
            self.core.transition(&mut job, Status::Cancelled, now);
            send_job_to_owner(&job, self_id, ctx)?;
            return self.re_evaluate(pool, self_id, ctx);
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
        self.re_evaluate(pool, self_id, ctx)
    }

    fn set_listener(&mut self, listener: Box<dyn FnMut(JobId, Status, Status)>) {
        self.core.set_listener(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_scheduler_has_no_pivot() {
        let scheduler = AggressiveScheduler::new();
        assert_eq!(scheduler.pivot(), None);
    }
}
