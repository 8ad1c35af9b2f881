//! Jobs, their execution history, and reservations.

use crate::ids::{EntityId, JobId, ReservationId};
use crate::range::RangeList;

use super::Status;

/// One contiguous execution burst of a job: the range it occupied over
/// `[start, finish)`, plus any resume overhead charged when this burst
/// restarted a preempted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobActivity {
    pub start: i64,
    pub finish: i64,
    pub ranges: RangeList,
    pub resume_overhead: i64,
}

/// A schedulable unit of work: identity, timing, resource demand, and
/// execution history. Reservations are represented as a `WorkUnit` with a
/// mandatory `requested_start` (see [`Reservation`]) rather than a parallel
/// type hierarchy, matching spec.md §3's "job-like unit" framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub id: JobId,
    pub owner: EntityId,
    pub submit_time: i64,
    pub start_time: Option<i64>,
    pub finish_time: Option<i64>,
    pub user_duration: i64,
    pub remaining_work: i64,
    pub n_resources: usize,
    pub priority: i64,
    pub deadline: Option<i64>,
    pub reservation_id: Option<ReservationId>,
    pub status: Status,
    pub assigned: RangeList,
    pub activities: Vec<JobActivity>,
}

impl WorkUnit {
    pub fn new(
        id: JobId,
        owner: EntityId,
        submit_time: i64,
        duration: i64,
        n_resources: usize,
        priority: i64,
    ) -> Self {
        Self {
            id,
            owner,
            submit_time,
            start_time: None,
            finish_time: None,
            user_duration: duration,
            remaining_work: duration,
            n_resources,
            priority,
            deadline: None,
            reservation_id: None,
            status: Status::Unknown,
            assigned: RangeList::new(),
            activities: Vec::new(),
        }
    }

    pub fn with_deadline(mut self, deadline: i64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_reservation(mut self, reservation_id: ReservationId) -> Self {
        self.reservation_id = Some(reservation_id);
        self
    }

    /// Attempts the transition to `target`, recording start/finish times
    /// per spec.md §4.5.6. Returns `false` (a no-op) if the transition is
    /// not allowed from the current status.
    pub fn transition_to(&mut self, target: Status, now: i64) -> bool {
        if !self.status.can_transition_to(target) {
            return false;
        }
        if target == Status::InExecution && self.status != Status::Paused {
            self.start_time = Some(now);
        }
        if target.is_terminal() && matches!(self.status, Status::InExecution | Status::Paused) {
            self.finish_time = Some(now);
        }
        self.status = target;
        true
    }

    /// Records a new execution burst, consuming `ranges` (the caller must
    /// clone beforehand if it intends to retain them, per spec.md §3).
    pub fn push_activity(&mut self, start: i64, finish: i64, ranges: RangeList, resume_overhead: i64) {
        self.assigned = ranges.clone();
        self.activities.push(JobActivity {
            start,
            finish,
            ranges,
            resume_overhead,
        });
    }

    pub fn is_reservation_bound(&self) -> bool {
        self.reservation_id.is_some()
    }
}

/// An immovable advance booking: a `WorkUnit` with a mandatory requested
/// start time. `immovable` is always `true` (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: ReservationId,
    pub unit: WorkUnit,
    pub requested_start: i64,
}

impl Reservation {
    pub fn new(id: ReservationId, unit: WorkUnit, requested_start: i64) -> Self {
        Self {
            id,
            unit,
            requested_start,
        }
    }

    pub const fn immovable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> WorkUnit {
        WorkUnit::new(JobId::new(1), EntityId::new(0), 0, 100, 4, 0)
    }

    #[test]
    fn enqueue_then_start_records_start_time() {
        let mut job = unit();
        assert!(job.transition_to(Status::Enqueued, 0));
        assert!(job.transition_to(Status::Waiting, 0));
        assert!(job.transition_to(Status::InExecution, 5));
        assert_eq!(job.start_time, Some(5));
    }

    #[test]
    fn resume_from_paused_does_not_reset_start_time() {
        let mut job = unit();
        job.transition_to(Status::Enqueued, 0);
        job.transition_to(Status::Waiting, 0);
        job.transition_to(Status::InExecution, 0);
        job.transition_to(Status::Paused, 50);
        assert!(job.transition_to(Status::InExecution, 70));
        assert_eq!(job.start_time, Some(0));
    }

    #[test]
    fn completion_from_execution_records_finish_time() {
        let mut job = unit();
        job.transition_to(Status::Enqueued, 0);
        job.transition_to(Status::Waiting, 0);
        job.transition_to(Status::InExecution, 0);
        assert!(job.transition_to(Status::Complete, 100));
        assert_eq!(job.finish_time, Some(100));
    }

    #[test]
    fn illegal_transition_is_a_no_op() {
        let mut job = unit();
        assert!(!job.transition_to(Status::Complete, 10));
        assert_eq!(job.status, Status::Unknown);
    }

    #[test]
    fn reservation_is_always_immovable() {
        let reservation = Reservation::new(ReservationId::new(1), unit(), 10);
        assert!(reservation.immovable());
    }
}
