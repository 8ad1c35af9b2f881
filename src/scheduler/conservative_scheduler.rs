//! Conservative backfilling (spec.md §4.5.3): no queued job is ever delayed
//! by a later arrival. Every waiting job holds a tentative, already
//! allocated future slot; cancellation triggers a "compress" pass that may
//! move later jobs earlier but never later.

use std::collections::HashMap;

use crate::ids::{EntityId, JobId};
use crate::kernel::{EventKind, KernelContext, Payload};
use crate::resource_pool::ResourcePool;
use crate::workunit::{Status, WorkUnit};

use super::core::{allocate_resources_to_job, send_job_to_owner, start_job, SchedulerCore};
use super::error::SchedulerError;
use super::policy::Scheduler;

#[derive(Debug)]
pub struct ConservativeScheduler {
    core: SchedulerCore,
    tentative_start: HashMap<JobId, i64>,
}

impl ConservativeScheduler {
    pub fn new() -> Self {
        Self {
            core: SchedulerCore::new(),
            tentative_start: HashMap::new(),
        }
    }

    pub fn core(&self) -> &SchedulerCore {
        &self.core
    }

    pub fn tentative_start_of(&self, job_id: JobId) -> Option<i64> {
        self.tentative_start.get(&job_id).copied()
    }

    fn reserve_future_slot(
        &mut self,
        pool: &mut ResourcePool,
        job: &mut WorkUnit,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<bool, SchedulerError> {
        let now = ctx.now();
        let Some(start) = pool.find_start_time(job.n_resources as i64, now, job.remaining_work) else {
            return Ok(false);
        };
        let free = pool
            .check_availability_window(job.n_resources as i64, start, job.remaining_work, false)
            .expect("find_start_time guarantees feasibility");
        let ranges = free
            .select_resources(job.n_resources as i64)
            .expect("feasibility check guarantees enough indices");
        allocate_resources_to_job(&mut self.core, pool, job, start, &ranges, self_id, ctx)?;
        self.tentative_start.insert(job.id, start);
        Ok(true)
    }

    /// Releases `job_id`'s tentative slot and cancels its pending
    /// `TASK_START`, without removing it from `waiting`.
    fn release_tentative_slot(
        &mut self,
        pool: &mut ResourcePool,
        job_id: JobId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let Some(start) = self.tentative_start.remove(&job_id) else {
            return Ok(());
        };
        if let Some(job) = self.core.waiting.iter().find(|j| j.id == job_id) {
            let ranges = job.assigned.clone();
            let finish = start + job.remaining_work;
            pool.release(&ranges, start, finish)?;
        }
        ctx.cancel_next_future_event(|event| {
            event.kind == EventKind::TaskStart && event.payload == Payload::Job(job_id)
        });
        Ok(())
    }

    /// After a cancellation at `cancelled_start`, release and re-reserve
    /// every non-reservation waiting job tentatively placed later, from the
    /// head of arrival order.
    fn compress(
        &mut self,
        pool: &mut ResourcePool,
        cancelled_start: i64,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let affected: Vec<JobId> = self
            .core
            .waiting
            .iter()
            .filter(|j| !j.is_reservation_bound())
            .filter_map(|j| self.tentative_start.get(&j.id).map(|&start| (j.id, start)))
            .filter(|&(_, start)| start > cancelled_start)
            .map(|(id, _)| id)
            .collect();

        for id in &affected {
            self.release_tentative_slot(pool, *id, ctx)?;
        }

        let mut order: Vec<JobId> = affected;
        order.sort_by_key(|id| {
            self.core
                .waiting
                .iter()
                .find(|j| j.id == *id)
                .map(|j| (j.submit_time, j.id.raw()))
                .unwrap_or((i64::MAX, 0))
        });

        for id in order {
            if let Some(idx) = self.core.waiting.iter().position(|j| j.id == id) {
                let mut job = self.core.waiting[idx].clone();
                self.reserve_future_slot(pool, &mut job, self_id, ctx)?;
                self.core.waiting[idx] = job;
            }
        }
        Ok(())
    }
}

impl Default for ConservativeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ConservativeScheduler {
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
        self.reserve_future_slot(pool, &mut job, self_id, ctx)?;
        self.core.waiting.push(job);
        Ok(())
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
        self.tentative_start.remove(&job_id);
        let now = ctx.now();
        self.core.transition(&mut job, Status::InExecution, now);
        ctx.send(self_id, self_id, job.remaining_work, EventKind::TaskComplete, Payload::Job(job.id))?;
        self.core.running.push(job);
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

        if let Some(start) = self.tentative_start_of(job_id) {
            self.release_tentative_slot(pool, job_id, ctx)?;
            if let Some(mut job) = self.core.remove_from_waiting(job_id) {
                self.core.transition(&mut job, Status::Cancelled, now);
                send_job_to_owner(&job, self_id, ctx)?;
            }
            self.compress(pool, start, self_id, ctx)?;
            return Ok(());
        }

        let Some(mut job) = self.core.remove_from_running(job_id) else {
            return Err(SchedulerError::UnknownJob(job_id));
        };
        let cancelled_start = job.activities.last().map(|a| a.start).unwrap_or(now);
        self.core.transition(&mut job, Status::Cancelled, now);
        ctx.cancel_future_events(|event| {
            event.kind == EventKind::TaskComplete && event.payload == Payload::Job(job_id)
        });
        let ranges = job.assigned.clone();
        if let Some(activity) = job.activities.last() {
            pool.release(&ranges, activity.start, now.max(activity.finish))?;
        }
        send_job_to_owner(&job, self_id, ctx)?;
        self.compress(pool, cancelled_start, self_id, ctx)?;
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
    fn fresh_scheduler_has_no_tentative_reservations() {
        let scheduler = ConservativeScheduler::new();
        assert!(scheduler.tentative_start.is_empty());
        assert!(scheduler.core().waiting.is_empty());
    }
}
