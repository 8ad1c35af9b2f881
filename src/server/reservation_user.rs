//! `ReservationUser`: makes, receives responses to, and completes
//! reservations, in addition to ordinary job submission.

use crate::ids::{Counter, EntityId, JobId, ReservationId};
use crate::kernel::{Entity, EntityState, Event, EventKind, KernelContext, KernelError, Payload};
use crate::workunit::{Reservation, WorkUnit};

#[derive(Debug)]
pub struct ReservationUser {
    state: EntityState,
    server: EntityId,
    next_job_id: Counter,
    next_reservation_id: Counter,
    accepted: Vec<ReservationId>,
    rejected: Vec<ReservationId>,
}

impl ReservationUser {
    pub fn new(id: EntityId, name: impl Into<String>, server: EntityId) -> Self {
        Self {
            state: EntityState::new(id, name),
            server,
            next_job_id: Counter::new(),
            next_reservation_id: Counter::new(),
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn accepted(&self) -> &[ReservationId] {
        &self.accepted
    }

    pub fn rejected(&self) -> &[ReservationId] {
        &self.rejected
    }

    /// Requests an immovable window of `n_resources` for `duration`
    /// starting at `requested_start`.
    pub fn request_reservation(
        &mut self,
        requested_start: i64,
        duration: i64,
        n_resources: usize,
        delay: i64,
        ctx: &mut KernelContext,
    ) -> Result<ReservationId, KernelError> {
        let reservation_id = ReservationId::new(self.next_reservation_id.next());
        let job_id = JobId::new(self.next_job_id.next());
        let unit = WorkUnit::new(job_id, self.id(), ctx.now(), duration, n_resources, 0).with_reservation(reservation_id);
        let reservation = Reservation::new(reservation_id, unit, requested_start);
        ctx.send(self.id(), self.server, delay, EventKind::ReservationRequest, Payload::NewReservation(reservation))?;
        Ok(reservation_id)
    }

    /// Submits a job tagged to draw resources from an accepted reservation.
    pub fn submit_reservation_job(
        &mut self,
        reservation_id: ReservationId,
        duration: i64,
        n_resources: usize,
        delay: i64,
        ctx: &mut KernelContext,
    ) -> Result<JobId, KernelError> {
        let id = JobId::new(self.next_job_id.next());
        let job = WorkUnit::new(id, self.id(), ctx.now(), duration, n_resources, 0).with_reservation(reservation_id);
        ctx.send(self.id(), self.server, delay, EventKind::TaskArrive, Payload::NewJob(job))?;
        Ok(id)
    }

    pub fn complete_reservation(&mut self, reservation_id: ReservationId, delay: i64, ctx: &mut KernelContext) -> Result<(), KernelError> {
        ctx.send(self.id(), self.server, delay, EventKind::ReservationComplete, Payload::Reservation(reservation_id))
    }

    pub fn cancel_reservation(&mut self, reservation_id: ReservationId, delay: i64, ctx: &mut KernelContext) -> Result<(), KernelError> {
        ctx.send(self.id(), self.server, delay, EventKind::ReservationCancel, Payload::Reservation(reservation_id))
    }
}

impl Entity for ReservationUser {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn process(&mut self, event: &Event, _ctx: &mut KernelContext) {
        if let Payload::ReservationResponse { reservation_id, accepted } = &event.payload {
            if *accepted {
                self.accepted.push(*reservation_id);
            } else {
                self.rejected.push(*reservation_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_reservation_user_has_no_responses() {
        let user = ReservationUser::new(EntityId::new(0), "bob", EntityId::new(1));
        assert!(user.accepted().is_empty());
        assert!(user.rejected().is_empty());
    }
}
