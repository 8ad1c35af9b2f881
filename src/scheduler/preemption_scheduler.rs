//! Preemptive priority scheduling (spec.md §4.5.2): an arrival that cannot
//! start may bump a lower-priority running job to `PAUSED` and resume it
//! later, charged a configurable resume overhead.

use crate::ids::{EntityId, JobId};
use crate::kernel::{EventKind, KernelContext, Payload};
use crate::resource_pool::ResourcePool;
use crate::workunit::{Status, WorkUnit};

use super::comparator::{hpf_comparator, JobComparator};
use super::core::{send_job_to_owner, start_job, SchedulerCore};
use super::error::SchedulerError;
use super::policy::Scheduler;

#[derive(Debug)]
pub struct PreemptionScheduler {
    core: SchedulerCore,
    priority_comparator: JobComparator,
    resume_overhead: i64,
}

impl PreemptionScheduler {
    pub fn new(resume_overhead: i64) -> Self {
        Self {
            core: SchedulerCore::new(),
            priority_comparator: hpf_comparator(),
            resume_overhead,
        }
    }

    pub fn core(&self) -> &SchedulerCore {
        &self.core
    }

    /// Releases `v`'s active allocation from `now` onward, cancels its
    /// pending `TASK_COMPLETE`, and moves it to `waiting` as `PAUSED`.
    fn preempt(
        &mut self,
        pool: &mut ResourcePool,
        mut v: WorkUnit,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let now = ctx.now();
        let planned_finish = v.activities.last().map(|a| a.finish).unwrap_or(now);
        let remaining_now = (planned_finish - now).max(0);
        let ranges = v.assigned.clone();
        pool.release(&ranges, now, now + remaining_now)?;
        ctx.cancel_next_future_event(|event| {
            event.kind == EventKind::TaskComplete && event.payload == Payload::Job(v.id)
        });
        v.remaining_work = remaining_now;
        self.core.transition(&mut v, Status::Paused, now);
        self.core.enqueue_waiting(v);
        Ok(())
    }

    /// Finds the weakest running job the arriving job strictly outranks.
    fn find_preemption_victim(&self, arriving: &WorkUnit) -> Option<JobId> {
        self.core
            .running
            .iter()
            .filter(|v| v.remaining_work > 0 && (self.priority_comparator)(arriving, v) == std::cmp::Ordering::Less)
            .max_by(|a, b| (self.priority_comparator)(a, b))
            .map(|v| v.id)
    }

    fn try_resume_or_start(
        &mut self,
        job: &mut WorkUnit,
        pool: &mut ResourcePool,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<bool, SchedulerError> {
        if job.status == Status::Paused {
            job.remaining_work += self.resume_overhead;
        }
        start_job(&mut self.core, pool, job, self_id, ctx)
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
            if self.try_resume_or_start(&mut job, pool, self_id, ctx)? {
                self.core.remove_from_waiting(job.id);
                self.core.running.push(job);
            } else {
                break;
            }
        }
        Ok(())
    }
}

impl Default for PreemptionScheduler {
    /// No resume overhead, matching `ServerBuilder`'s zero-config path.
    fn default() -> Self {
        Self::new(0)
    }
}

impl Scheduler for PreemptionScheduler {
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

        if let Some(victim_id) = self.find_preemption_victim(&job) {
            let victim = self.core.remove_from_running(victim_id).expect("victim is running");
            self.preempt(pool, victim, self_id, ctx)?;
            if start_job(&mut self.core, pool, &mut job, self_id, ctx)? {
                self.core.running.push(job);
                return Ok(());
            }
        }

        self.core.transition(&mut job, Status::Waiting, now);
        self.core.enqueue_waiting(job);
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
    fn victim_must_strictly_outrank_and_have_remaining_work() {
        let mut scheduler = PreemptionScheduler::new(5);
        let owner = EntityId::new(1);
        let mut low_priority_running = WorkUnit::new(JobId::new(1), owner, 0, 100, 1, 5);
        low_priority_running.remaining_work = 100;
        scheduler.core.running.push(low_priority_running);

        let arriving = WorkUnit::new(JobId::new(2), owner, 50, 100, 1, 0);
        assert_eq!(scheduler.find_preemption_victim(&arriving), Some(JobId::new(1)));

        let arriving_weaker = WorkUnit::new(JobId::new(3), owner, 50, 100, 1, 10);
        assert_eq!(scheduler.find_preemption_victim(&arriving_weaker), None);
    }
}
