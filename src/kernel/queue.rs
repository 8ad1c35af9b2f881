//! Min-heap wrapper ordering events by `(time, serial)` ascending.
//!
//! `BinaryHeap` is a max-heap, so [`QueuedEvent`]'s `Ord` impl reverses the
//! natural `(time, serial)` comparison — the same trick used by the
//! closest-domain sibling in the retrieval pack (a FaaS discrete-event
//! simulator's own event queue), since the teacher crate has no event
//! queue of its own to ground this on.

use std::cmp::Ordering;

use super::event::Event;

#[derive(Debug, Clone)]
pub struct QueuedEvent(pub Event);

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.0.order_key() == other.0.order_key()
    }
}

impl Eq for QueuedEvent {}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.order_key().cmp(&self.0.order_key())
    }
}
