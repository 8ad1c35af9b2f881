//! Shared scheduling machinery (spec.md §4.5): the waiting/running queues,
//! status-change notification, and the `startJob` / `allocateResourcesToJob`
//! / `sendJobToOwner` helpers every policy builds on. Modelled as a
//! capability set embedded by each concrete scheduler, not a base class
//! (spec.md §9).

use crate::ids::{EntityId, JobId};
use crate::kernel::{EventKind, KernelContext, Payload};
use crate::resource_pool::ResourcePool;
use crate::workunit::{Status, WorkUnit};

use super::comparator::{fifo_comparator, JobComparator};
use super::error::SchedulerError;

/// Queues and notification plumbing shared by every scheduling policy.
pub struct SchedulerCore {
    pub waiting: Vec<WorkUnit>,
    pub running: Vec<WorkUnit>,
    comparator: JobComparator,
    listener: Option<Box<dyn FnMut(JobId, Status, Status)>>,
}

impl std::fmt::Debug for SchedulerCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerCore")
            .field("waiting", &self.waiting.len())
            .field("running", &self.running.len())
            .finish()
    }
}

impl SchedulerCore {
    pub fn new() -> Self {
        Self {
            waiting: Vec::new(),
            running: Vec::new(),
            comparator: fifo_comparator(),
            listener: None,
        }
    }

    pub fn set_comparator(&mut self, comparator: JobComparator) {
        self.comparator = comparator;
    }

    pub fn set_listener(&mut self, listener: Box<dyn FnMut(JobId, Status, Status)>) {
        self.listener = Some(listener);
    }

    /// Inserts `job` into `waiting`, keeping it sorted by the installed
    /// comparator (FIFO by default).
    pub fn enqueue_waiting(&mut self, job: WorkUnit) {
        let pos = self
            .waiting
            .binary_search_by(|existing| (self.comparator)(existing, &job))
            .unwrap_or_else(|p| p);
        self.waiting.insert(pos, job);
    }

    pub fn remove_from_waiting(&mut self, job_id: JobId) -> Option<WorkUnit> {
        let idx = self.waiting.iter().position(|j| j.id == job_id)?;
        Some(self.waiting.remove(idx))
    }

    pub fn remove_from_running(&mut self, job_id: JobId) -> Option<WorkUnit> {
        let idx = self.running.iter().position(|j| j.id == job_id)?;
        Some(self.running.remove(idx))
    }

    pub fn find_running(&self, job_id: JobId) -> Option<&WorkUnit> {
        self.running.iter().find(|j| j.id == job_id)
    }

    pub fn find_running_mut(&mut self, job_id: JobId) -> Option<&mut WorkUnit> {
        self.running.iter_mut().find(|j| j.id == job_id)
    }

    /// Transitions `job` and notifies the listener with the previous status.
    pub fn transition(&mut self, job: &mut WorkUnit, target: Status, now: i64) -> bool {
        let previous = job.status;
        if !job.transition_to(target, now) {
            return false;
        }
        if let Some(listener) = &mut self.listener {
            listener(job.id, previous, target);
        }
        true
    }
}

impl Default for SchedulerCore {
    fn default() -> Self {
        Self::new()
    }
}

/// At the current time, tries to start `job` immediately: on success it is
/// allocated, transitioned to `InExecution`, and a self-directed
/// `TASK_COMPLETE` is scheduled. On failure the profile is left untouched.
pub fn start_job(
    core: &mut SchedulerCore,
    pool: &mut ResourcePool,
    job: &mut WorkUnit,
    self_id: EntityId,
    ctx: &mut KernelContext,
) -> Result<bool, SchedulerError> {
    let now = ctx.now();
    let Some(free) = pool.check_availability_window(job.n_resources as i64, now, job.remaining_work, false)
    else {
        return Ok(false);
    };
    let ranges = free
        .select_resources(job.n_resources as i64)
        .expect("checked availability above guarantees enough indices");
    pool.allocate(&ranges, now, now + job.remaining_work)?;
    job.push_activity(now, now + job.remaining_work, ranges, 0);
    core.transition(job, Status::InExecution, now);
    ctx.send(self_id, self_id, job.remaining_work, EventKind::TaskComplete, Payload::Job(job.id))?;
    Ok(true)
}

/// Allocates a future slot `[start_in_future, start_in_future + duration)`
/// for `job` and schedules a self-directed `TASK_START`.
pub fn allocate_resources_to_job(
    core: &mut SchedulerCore,
    pool: &mut ResourcePool,
    job: &mut WorkUnit,
    start_in_future: i64,
    ranges: &crate::range::RangeList,
    self_id: EntityId,
    ctx: &mut KernelContext,
) -> Result<(), SchedulerError> {
    pool.allocate(ranges, start_in_future, start_in_future + job.remaining_work)?;
    job.assigned = ranges.clone();
    core.transition(job, Status::Waiting, ctx.now());
    let delay = start_in_future - ctx.now();
    ctx.send(self_id, self_id, delay, EventKind::TaskStart, Payload::Job(job.id))?;
    Ok(())
}

/// Notifies the job's owner via `RESULT_ARRIVE` once it has reached a
/// terminal status.
pub fn send_job_to_owner(
    job: &WorkUnit,
    self_id: EntityId,
    ctx: &mut KernelContext,
) -> Result<(), SchedulerError> {
    if job.status.is_terminal() {
        ctx.send(self_id, job.owner, 0, EventKind::ResultArrive, Payload::Job(job.id))?;
    }
    Ok(())
}
