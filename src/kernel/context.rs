//! The handle entities use to talk back to the kernel from inside `process`.

use std::collections::BinaryHeap;

use crate::ids::{Counter, EntityId};

use super::error::KernelError;
use super::event::{Event, EventKind, Payload};
use super::queue::QueuedEvent;

/// Everything an [`Entity`](super::entity::Entity) is allowed to do to the
/// kernel while handling an event: read the current time, schedule future
/// events, and cancel pending ones. Deliberately does **not** expose the
/// entity registry, so the dispatch loop can hand out a `KernelContext`
/// while one of the registry's own entities is being processed.
pub struct KernelContext<'a> {
    pub(super) now: i64,
    pub(super) future: &'a mut BinaryHeap<QueuedEvent>,
    pub(super) next_serial: &'a mut Counter,
}

impl<'a> KernelContext<'a> {
    pub fn now(&self) -> i64 {
        self.now
    }

    /// Schedules `payload` for delivery to `destination` after `delay`
    /// logical time units. `delay == 0` is legal: the event is still
    /// queued, not delivered inline, and will be picked up on the next
    /// tick boundary.
    pub fn send(
        &mut self,
        source: EntityId,
        destination: EntityId,
        delay: i64,
        kind: EventKind,
        payload: Payload,
    ) -> Result<(), KernelError> {
        if delay < 0 {
            return Err(KernelError::NegativeDelay(delay));
        }
        let serial = self.next_serial.next();
        self.future.push(QueuedEvent(Event {
            time: self.now + delay,
            serial,
            kind,
            source,
            destination,
            payload,
        }));
        Ok(())
    }

    /// Removes every future event matching `pred`.
    pub fn cancel_future_events<F>(&mut self, pred: F)
    where
        F: Fn(&Event) -> bool,
    {
        let retained: Vec<QueuedEvent> = self
            .future
            .drain()
            .filter(|queued| !pred(&queued.0))
            .collect();
        self.future.extend(retained);
    }

    /// Removes only the first future event (in `(time, serial)` order)
    /// matching `pred`. Returns true if one was removed.
    pub fn cancel_next_future_event<F>(&mut self, pred: F) -> bool
    where
        F: Fn(&Event) -> bool,
    {
        let mut all: Vec<QueuedEvent> = self.future.drain().collect();
        all.sort_by_key(|queued| queued.0.order_key());

        let target = all.iter().position(|queued| pred(&queued.0));
        if let Some(idx) = target {
            all.remove(idx);
        }
        self.future.extend(all);
        target.is_some()
    }
}
