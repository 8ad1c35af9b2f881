//! Reservation + conservative backfilling (spec.md §4.5.5): ordinary jobs
//! use conservative backfilling against the main pool; reservations book an
//! immovable window, releasing it into their own parallel profile, and
//! jobs tagged with a reservation id draw only from that window.

use std::collections::HashMap;

use crate::ids::{EntityId, JobId, ReservationId};
use crate::kernel::{EventKind, KernelContext, Payload};
use crate::profile::ReservationProfile;
use crate::resource_pool::ResourcePool;
use crate::workunit::{Reservation, Status, WorkUnit};

use super::conservative_scheduler::ConservativeScheduler;
use super::core::{send_job_to_owner, SchedulerCore};
use super::error::SchedulerError;
use super::policy::Scheduler;

#[derive(Debug)]
struct ActiveReservation {
    reservation: Reservation,
    finish: i64,
    dependents: Vec<JobId>,
}

#[derive(Debug)]
pub struct ReservationScheduler {
    ordinary: ConservativeScheduler,
    reservation_profile: ReservationProfile,
    reservation_jobs: SchedulerCore,
    active: HashMap<ReservationId, ActiveReservation>,
    job_reservation: HashMap<JobId, ReservationId>,
}

impl ReservationScheduler {
    pub fn new(capacity: i64) -> Result<Self, SchedulerError> {
        Ok(Self {
            ordinary: ConservativeScheduler::new(),
            reservation_profile: ReservationProfile::new(capacity)
                .map_err(crate::resource_pool::ResourcePoolError::from)?,
            reservation_jobs: SchedulerCore::new(),
            active: HashMap::new(),
            job_reservation: HashMap::new(),
        })
    }

    pub fn ordinary(&self) -> &ConservativeScheduler {
        &self.ordinary
    }

    fn start_reservation_job(
        &mut self,
        mut job: WorkUnit,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let reservation_id = job.reservation_id.expect("caller guarantees reservation-bound job");
        let Some(active) = self.active.get(&reservation_id) else {
            let now = ctx.now();
            self.reservation_jobs.transition(&mut job, Status::Failed, now);
            send_job_to_owner(&job, self_id, ctx)?;
            return Ok(());
        };
        let now = ctx.now();
        let window = active.reservation.unit.assigned.clone();
        match self
            .reservation_profile
            .check_availability_window(&window, job.n_resources as i64, now, job.remaining_work)
        {
            Some(free) => {
                let ranges = free
                    .select_resources(job.n_resources as i64)
                    .expect("feasibility check guarantees enough indices");
                self.reservation_profile
                    .allocate_resource_ranges(&ranges, now, now + job.remaining_work)
                    .map_err(crate::resource_pool::ResourcePoolError::from)?;
                job.push_activity(now, now + job.remaining_work, ranges, 0);
                self.reservation_jobs.transition(&mut job, Status::InExecution, now);
                ctx.send(self_id, self_id, job.remaining_work, EventKind::TaskComplete, Payload::Job(job.id))?;
                self.job_reservation.insert(job.id, reservation_id);
                if let Some(active) = self.active.get_mut(&reservation_id) {
                    active.dependents.push(job.id);
                }
                self.reservation_jobs.running.push(job);
            }
            None => {
                self.reservation_jobs.transition(&mut job, Status::Waiting, now);
                self.reservation_jobs.enqueue_waiting(job);
            }
        }
        Ok(())
    }
}

impl Scheduler for ReservationScheduler {
    fn on_job_arrive(
        &mut self,
        pool: &mut ResourcePool,
        job: WorkUnit,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        if job.reservation_id.is_some() {
            self.start_reservation_job(job, self_id, ctx)
        } else {
            self.ordinary.on_job_arrive(pool, job, self_id, ctx)
        }
    }

    fn on_task_start(
        &mut self,
        pool: &mut ResourcePool,
        job_id: JobId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        if self.job_reservation.contains_key(&job_id) {
            return Ok(());
        }
        self.ordinary.on_task_start(pool, job_id, self_id, ctx)
    }

    fn on_job_complete(
        &mut self,
        pool: &mut ResourcePool,
        job_id: JobId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        if let Some(reservation_id) = self.job_reservation.remove(&job_id) {
            let Some(mut job) = self.reservation_jobs.remove_from_running(job_id) else {
                return Err(SchedulerError::UnknownJob(job_id));
            };
            let now = ctx.now();
            self.reservation_jobs.transition(&mut job, Status::Complete, now);
            let ranges = job.assigned.clone();
            if let Some(activity) = job.activities.last() {
                self.reservation_profile
                    .add_time_slot(&ranges, activity.start, activity.finish)
                    .map_err(crate::resource_pool::ResourcePoolError::from)?;
            }
            if let Some(active) = self.active.get_mut(&reservation_id) {
                active.dependents.retain(|id| *id != job_id);
            }
            send_job_to_owner(&job, self_id, ctx)?;
            return Ok(());
        }
        self.ordinary.on_job_complete(pool, job_id, self_id, ctx)
    }

    fn on_job_cancel(
        &mut self,
        pool: &mut ResourcePool,
        job_id: JobId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        if self.job_reservation.contains_key(&job_id) {
            let reservation_id = self.job_reservation.remove(&job_id).unwrap();
            let now = ctx.now();
            if let Some(mut job) = self.reservation_jobs.remove_from_running(job_id) {
                self.reservation_jobs.transition(&mut job, Status::Cancelled, now);
                ctx.cancel_future_events(|event| {
                    event.kind == EventKind::TaskComplete && event.payload == Payload::Job(job_id)
                });
                let ranges = job.assigned.clone();
                if let Some(activity) = job.activities.last() {
                    self.reservation_profile
                        .add_time_slot(&ranges, activity.start, now.max(activity.finish))
                        .map_err(crate::resource_pool::ResourcePoolError::from)?;
                }
                if let Some(active) = self.active.get_mut(&reservation_id) {
                    active.dependents.retain(|id| *id != job_id);
                }
                send_job_to_owner(&job, self_id, ctx)?;
            } else if let Some(mut job) = self.reservation_jobs.remove_from_waiting(job_id) {
                self.reservation_jobs.transition(&mut job, Status::Cancelled, now);
                send_job_to_owner(&job, self_id, ctx)?;
            }
            return Ok(());
        }
        self.ordinary.on_job_cancel(pool, job_id, self_id, ctx)
    }

    fn on_reservation_request(
        &mut self,
        pool: &mut ResourcePool,
        mut reservation: Reservation,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let start = reservation.requested_start;
        let finish = start + reservation.unit.remaining_work;
        let n = reservation.unit.n_resources as i64;

        let Some(free) = pool.check_availability_window(n, start, reservation.unit.remaining_work, false) else {
            ctx.send(
                self_id,
                reservation.unit.owner,
                0,
                EventKind::ReservationResponse,
                Payload::ReservationResponse {
                    reservation_id: reservation.id,
                    accepted: false,
                },
            )?;
            return Ok(());
        };
        let ranges = free.select_resources(n).expect("feasibility check guarantees enough indices");

        pool.allocate(&ranges, start, finish)?;
        self.reservation_profile
            .grant(&ranges, start, finish)
            .map_err(crate::resource_pool::ResourcePoolError::from)?;
        reservation.unit.assigned = ranges;

        ctx.send(
            self_id,
            reservation.unit.owner,
            0,
            EventKind::ReservationResponse,
            Payload::ReservationResponse {
                reservation_id: reservation.id,
                accepted: true,
            },
        )?;
        self.active.insert(
            reservation.id,
            ActiveReservation {
                reservation,
                finish,
                dependents: Vec::new(),
            },
        );
        Ok(())
    }

    fn on_reservation_complete(
        &mut self,
        pool: &mut ResourcePool,
        reservation_id: ReservationId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let Some(active) = self.active.remove(&reservation_id) else {
            return Err(SchedulerError::UnknownReservation(reservation_id));
        };
        let ranges = active.reservation.unit.assigned.clone();
        self.reservation_profile
            .revoke(&ranges, active.reservation.requested_start, active.finish)
            .map_err(crate::resource_pool::ResourcePoolError::from)?;
        pool.release(&ranges, active.reservation.requested_start, active.finish)?;
        ctx.send(self_id, active.reservation.unit.owner, 0, EventKind::ReservationComplete, Payload::Reservation(reservation_id))?;
        Ok(())
    }

    fn on_reservation_cancel(
        &mut self,
        pool: &mut ResourcePool,
        reservation_id: ReservationId,
        self_id: EntityId,
        ctx: &mut KernelContext,
    ) -> Result<(), SchedulerError> {
        let Some(active) = self.active.remove(&reservation_id) else {
            return Err(SchedulerError::UnknownReservation(reservation_id));
        };
        let ranges = active.reservation.unit.assigned.clone();
        self.reservation_profile
            .revoke(&ranges, active.reservation.requested_start, active.finish)
            .map_err(crate::resource_pool::ResourcePoolError::from)?;
        pool.release(&ranges, active.reservation.requested_start, active.finish)?;

        for job_id in &active.dependents {
            if let Some(mut job) = self
                .reservation_jobs
                .remove_from_running(*job_id)
                .or_else(|| self.reservation_jobs.remove_from_waiting(*job_id))
            {
                let now = ctx.now();
                self.reservation_jobs.transition(&mut job, Status::Cancelled, now);
                send_job_to_owner(&job, self_id, ctx)?;
            }
            self.job_reservation.remove(job_id);
        }

        ctx.send(self_id, active.reservation.unit.owner, 0, EventKind::ReservationCancel, Payload::Reservation(reservation_id))?;
        Ok(())
    }

    /// Forwards to the ordinary-job scheduler only; reservation-bound jobs
    /// run against `reservation_jobs`, a queue with no analogue in the
    /// builder surface's single listener slot.
    fn set_listener(&mut self, listener: Box<dyn FnMut(JobId, Status, Status)>) {
        self.ordinary.set_listener(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_scheduler_has_no_active_reservations() {
        let scheduler = ReservationScheduler::new(10).unwrap();
        assert!(scheduler.active.is_empty());
    }
}
