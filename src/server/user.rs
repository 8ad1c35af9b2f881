//! `User`: submits jobs and collects `RESULT_ARRIVE` notifications.

use crate::ids::{Counter, EntityId, JobId};
use crate::kernel::{Entity, EntityState, Event, EventKind, KernelContext, KernelError, Payload};
use crate::workunit::WorkUnit;

#[derive(Debug)]
pub struct User {
    state: EntityState,
    server: EntityId,
    next_job_id: Counter,
    results: Vec<JobId>,
}

impl User {
    pub fn new(id: EntityId, name: impl Into<String>, server: EntityId) -> Self {
        Self {
            state: EntityState::new(id, name),
            server,
            next_job_id: Counter::new(),
            results: Vec::new(),
        }
    }

    pub fn results(&self) -> &[JobId] {
        &self.results
    }

    /// Submits a freshly minted job, arriving at the server after `delay`.
    pub fn submit_job(
        &mut self,
        duration: i64,
        n_resources: usize,
        priority: i64,
        delay: i64,
        ctx: &mut KernelContext,
    ) -> Result<JobId, KernelError> {
        let id = JobId::new(self.next_job_id.next());
        let job = WorkUnit::new(id, self.id(), ctx.now(), duration, n_resources, priority);
        ctx.send(self.id(), self.server, delay, EventKind::TaskArrive, Payload::NewJob(job))?;
        Ok(id)
    }

    pub fn cancel_job(&mut self, job_id: JobId, delay: i64, ctx: &mut KernelContext) -> Result<(), KernelError> {
        ctx.send(self.id(), self.server, delay, EventKind::TaskCancel, Payload::Job(job_id))
    }
}

impl Entity for User {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn process(&mut self, event: &Event, _ctx: &mut KernelContext) {
        if event.kind == EventKind::ResultArrive {
            if let Payload::Job(job_id) = &event.payload {
                self.results.push(*job_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_user_has_no_results() {
        let user = User::new(EntityId::new(0), "alice", EntityId::new(1));
        assert!(user.results().is_empty());
    }
}
