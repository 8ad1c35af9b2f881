//! `Server<S>`: binds a resource pool and availability calendar to a
//! scheduling policy, and routes kernel events to it (spec.md §4.4).

use crate::availability_calendar::AvailabilityCalendar;
use crate::kernel::{Entity, EntityState, Event, EventKind, KernelContext, Payload};
use crate::resource_pool::ResourcePool;
use crate::scheduler::Scheduler;

#[derive(Debug)]
pub struct Server<S: Scheduler> {
    state: EntityState,
    pool: ResourcePool,
    scheduler: S,
    calendar: Option<AvailabilityCalendar>,
}

impl<S: Scheduler> Server<S> {
    pub(super) fn from_parts(state: EntityState, pool: ResourcePool, scheduler: S, calendar: Option<AvailabilityCalendar>) -> Self {
        Self {
            state,
            pool,
            scheduler,
            calendar,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn calendar(&self) -> Option<&AvailabilityCalendar> {
        self.calendar.as_ref()
    }
}

impl<S: Scheduler> Entity for Server<S> {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn process(&mut self, event: &Event, ctx: &mut KernelContext) {
        let self_id = self.id();
        let outcome = match &event.payload {
            Payload::NewJob(job) if event.kind == EventKind::TaskArrive => {
                let mut job = job.clone();
                job.submit_time = ctx.now();
                self.scheduler.on_job_arrive(&mut self.pool, job, self_id, ctx)
            }
            Payload::Job(job_id) => {
                let job_id = *job_id;
                match event.kind {
                    EventKind::TaskCancel => self.scheduler.on_job_cancel(&mut self.pool, job_id, self_id, ctx),
                    EventKind::TaskStart => self.scheduler.on_task_start(&mut self.pool, job_id, self_id, ctx),
                    EventKind::TaskComplete => self.scheduler.on_job_complete(&mut self.pool, job_id, self_id, ctx),
                    _ => Ok(()),
                }
            }
            Payload::NewReservation(reservation) if event.kind == EventKind::ReservationRequest => {
                self.scheduler.on_reservation_request(&mut self.pool, reservation.clone(), self_id, ctx)
            }
            Payload::Reservation(reservation_id) => {
                let reservation_id = *reservation_id;
                match event.kind {
                    EventKind::ReservationComplete => self.scheduler.on_reservation_complete(&mut self.pool, reservation_id, self_id, ctx),
                    EventKind::ReservationCancel => self.scheduler.on_reservation_cancel(&mut self.pool, reservation_id, self_id, ctx),
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        };
        if let Err(err) = outcome {
            tracing::warn!(server = self.name(), error = %err, "scheduler dispatch failed");
        }
    }
}
