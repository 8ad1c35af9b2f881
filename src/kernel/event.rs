//! Event vocabulary and the `(time, serial)`-ordered event envelope.

use crate::ids::{EntityId, JobId, ReservationId};
use crate::workunit::{Reservation, WorkUnit};

/// Event type vocabulary (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TaskArrive,
    TaskStart,
    TaskComplete,
    TaskCancel,
    TaskPause,
    ResultArrive,
    EntityArrive,
    EntityLeave,
    EntityInternalEvent,
    ReservationRequest,
    ReservationStart,
    ReservationComplete,
    ReservationCancel,
    ReservationResponse,
}

/// Payload carried by an event. Kept a closed enum (rather than `dyn Any`)
/// so dispatch stays exhaustively matchable, matching the teacher's
/// preference for concrete tagged data over type erasure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    None,
    /// A freshly submitted job, carried on `TASK_ARRIVE` (the server has
    /// not registered it anywhere yet).
    NewJob(WorkUnit),
    Job(JobId),
    /// A freshly requested reservation, carried on `RESERVATION_REQUEST`.
    NewReservation(Reservation),
    Reservation(ReservationId),
    ReservationResponse {
        reservation_id: ReservationId,
        accepted: bool,
    },
}

/// A single dispatchable event: `(time, serial, kind, source, destination, payload)`.
///
/// Ordering key is `(time, serial)`; `serial` is assigned at creation by
/// the owning [`crate::kernel::Simulation`] and breaks ties between
/// co-temporal events deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub time: i64,
    pub serial: u64,
    pub kind: EventKind,
    pub source: EntityId,
    pub destination: EntityId,
    pub payload: Payload,
}

impl Event {
    /// The `(time, serial)` tuple used for queue ordering and stable
    /// tie-breaking.
    pub fn order_key(&self) -> (i64, u64) {
        (self.time, self.serial)
    }
}
