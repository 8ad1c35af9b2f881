//! The dispatch loop: clock + future/deferred event queues + entity registry.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::ids::{Counter, EntityId};

use super::clock::{Clock, SimStatus};
use super::context::KernelContext;
use super::entity::Entity;
use super::error::KernelError;
use super::event::{Event, EventKind, Payload};
use super::queue::QueuedEvent;

/// Outcome of a single `run_clock_tick` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    /// The deferred batch was delivered and a new one queued for next tick.
    Continue,
    /// The deferred batch was delivered and the future queue is empty.
    Finished,
}

/// The discrete-event kernel: virtual clock, future/deferred event queues,
/// and the entity registry.
pub struct Simulation {
    clock: Clock,
    future: BinaryHeap<QueuedEvent>,
    deferred: Vec<Event>,
    entities: Vec<Option<Box<dyn Entity>>>,
    next_entity_id: Counter,
    next_serial: Counter,
    tick_comparator: Option<Box<dyn Fn(&Event, &Event) -> Ordering>>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("time", &self.clock.time())
            .field("status", &self.clock.status())
            .field("entities", &self.entities.len())
            .field("future_len", &self.future.len())
            .field("deferred_len", &self.deferred.len())
            .finish()
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            clock: Clock::new(),
            future: BinaryHeap::new(),
            deferred: Vec::new(),
            entities: Vec::new(),
            next_entity_id: Counter::new(),
            next_serial: Counter::new(),
            tick_comparator: None,
        }
    }

    pub fn now(&self) -> i64 {
        self.clock.time()
    }

    pub fn status(&self) -> SimStatus {
        self.clock.status()
    }

    pub fn set_span(&mut self, span: i64) -> Result<(), KernelError> {
        if span <= 0 {
            return Err(KernelError::InvalidSpan(span));
        }
        self.clock.set_span(span);
        Ok(())
    }

    pub fn set_warm_up(&mut self, mark: i64) {
        self.clock.set_warm_up(mark);
    }

    pub fn warm_up(&self) -> Option<i64> {
        self.clock.warm_up()
    }

    /// Installs a comparator used to stable-sort co-temporal events before
    /// delivery each tick. Ties not resolved by the comparator keep their
    /// relative (serial) order, because `sort_by` is stable.
    pub fn set_tick_comparator<F>(&mut self, comparator: F)
    where
        F: Fn(&Event, &Event) -> Ordering + 'static,
    {
        self.tick_comparator = Some(Box::new(comparator));
    }

    /// Registers a new entity, handing the constructor its freshly
    /// allocated, monotonically increasing id.
    pub fn register_entity<E, F>(&mut self, ctor: F) -> EntityId
    where
        E: Entity + 'static,
        F: FnOnce(EntityId) -> E,
    {
        let id = EntityId::new(self.next_entity_id.next() as u32);
        let entity = ctor(id);
        self.entities.push(Some(Box::new(entity)));
        id
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        (0..self.entities.len()).map(|i| EntityId::new(i as u32))
    }

    /// Schedules an event for delivery `delay` units from now. Usable by
    /// driver programs outside of entity dispatch (e.g. seeding the first
    /// arrivals before `run`).
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
            time: self.clock.time() + delay,
            serial,
            kind,
            source,
            destination,
            payload,
        }));
        Ok(())
    }

    pub fn cancel_future_events<F>(&mut self, pred: F)
    where
        F: Fn(&Event) -> bool,
    {
        let retained: Vec<QueuedEvent> =
            self.future.drain().filter(|q| !pred(&q.0)).collect();
        self.future.extend(retained);
    }

    pub fn cancel_next_future_event<F>(&mut self, pred: F) -> bool
    where
        F: Fn(&Event) -> bool,
    {
        let mut all: Vec<QueuedEvent> = self.future.drain().collect();
        all.sort_by_key(|q| q.0.order_key());
        let target = all.iter().position(|q| pred(&q.0));
        if let Some(idx) = target {
            all.remove(idx);
        }
        self.future.extend(all);
        target.is_some()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    fn with_context<R>(&mut self, f: impl FnOnce(&mut KernelContext) -> R) -> R {
        let mut ctx = KernelContext {
            now: self.clock.time(),
            future: &mut self.future,
            next_serial: &mut self.next_serial,
        };
        f(&mut ctx)
    }

    fn dispatch_event(&mut self, event: Event) -> Result<(), KernelError> {
        let idx = event.destination.index();
        let slot = self
            .entities
            .get_mut(idx)
            .ok_or(KernelError::UnknownEntity(event.destination))?;
        let mut entity = slot.take().ok_or(KernelError::UnknownEntity(event.destination))?;
        if entity.is_enabled() {
            self.with_context(|ctx| entity.process(&event, ctx));
        }
        self.entities[idx] = Some(entity);
        Ok(())
    }

    fn for_each_entity(&mut self, mut f: impl FnMut(&mut Box<dyn Entity>, &mut KernelContext)) {
        for idx in 0..self.entities.len() {
            let mut entity = match self.entities[idx].take() {
                Some(e) => e,
                None => continue,
            };
            self.with_context(|ctx| f(&mut entity, ctx));
            self.entities[idx] = Some(entity);
        }
    }

    /// A single cycle of the tick algorithm (spec.md §4.3): deliver the
    /// previous deferred batch, then (if the future queue still holds
    /// events) gather the next co-temporal batch into `deferred`.
    fn run_clock_tick(&mut self) -> Result<TickOutcome, KernelError> {
        if let Some(comparator) = self.tick_comparator.take() {
            self.deferred.sort_by(|a, b| comparator(a, b));
            self.tick_comparator = Some(comparator);
        }

        let batch = std::mem::take(&mut self.deferred);
        for event in batch {
            self.dispatch_event(event)?;
        }

        if self.future.is_empty() {
            return Ok(TickOutcome::Finished);
        }

        let QueuedEvent(first) = self.future.pop().expect("checked non-empty above");
        if first.time < self.clock.time() {
            return Err(KernelError::ScheduledForThePast {
                now: self.clock.time(),
                requested: first.time,
            });
        }
        let tick_time = first.time;
        self.clock
            .advance_to(tick_time)
            .map_err(|(now, requested)| KernelError::ScheduledForThePast { now, requested })?;
        self.deferred.push(first);

        while let Some(QueuedEvent(next)) = self.future.peek() {
            if next.time == tick_time {
                let QueuedEvent(next) = self.future.pop().expect("peeked above");
                self.deferred.push(next);
            } else {
                break;
            }
        }

        Ok(TickOutcome::Continue)
    }

    /// Runs the simulation to completion: the future queue becomes empty,
    /// or the configured time span is reached (abrupt interrupt).
    pub fn run(&mut self) -> Result<(), KernelError> {
        self.clock.start();
        self.for_each_entity(|entity, ctx| entity.on_start(ctx));

        loop {
            match self.run_clock_tick()? {
                TickOutcome::Finished => break,
                TickOutcome::Continue => {
                    if self.clock.span_exhausted() {
                        break;
                    }
                }
            }
        }

        self.for_each_entity(|entity, ctx| entity.on_shutdown(ctx));
        self.clock.complete();
        Ok(())
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    /// Resets the simulation to `NOT_STARTED`. Rejects resetting a running
    /// simulation (spec.md §7).
    pub fn reset(&mut self) -> Result<(), KernelError> {
        if self.clock.status() == SimStatus::Running {
            return Err(KernelError::ResetWhileRunning);
        }
        self.clock.reset();
        self.future.clear();
        self.deferred.clear();
        Ok(())
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::entity::EntityState;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Recorder {
        state: EntityState,
        received: Rc<RefCell<Vec<(i64, EventKind)>>>,
    }

    impl Entity for Recorder {
        fn state(&self) -> &EntityState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut EntityState {
            &mut self.state
        }
        fn process(&mut self, event: &Event, _ctx: &mut KernelContext) {
            self.received.borrow_mut().push((event.time, event.kind));
        }
    }

    #[derive(Debug)]
    struct PingPongA {
        state: EntityState,
        peer: EntityId,
        delta: i64,
        remaining: i64,
        replies: usize,
    }

    impl Entity for PingPongA {
        fn state(&self) -> &EntityState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut EntityState {
            &mut self.state
        }
        fn on_start(&mut self, ctx: &mut KernelContext) {
            for i in 1..=self.remaining {
                ctx.send(self.state.id(), self.peer, i * self.delta, EventKind::TaskArrive, Payload::None)
                    .unwrap();
            }
        }
        fn process(&mut self, event: &Event, _ctx: &mut KernelContext) {
            if event.kind == EventKind::TaskComplete {
                self.replies += 1;
            }
        }
    }

    #[derive(Debug)]
    struct PingPongB {
        state: EntityState,
        arrivals: usize,
    }

    impl Entity for PingPongB {
        fn state(&self) -> &EntityState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut EntityState {
            &mut self.state
        }
        fn process(&mut self, event: &Event, ctx: &mut KernelContext) {
            if event.kind == EventKind::TaskArrive {
                self.arrivals += 1;
                ctx.send(self.state.id(), event.source, 0, EventKind::TaskComplete, Payload::None)
                    .unwrap();
            }
        }
    }

    #[test]
    fn delivers_in_time_then_serial_order() {
        let mut sim = Simulation::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let received_for_entity = received.clone();
        let entity_id = sim.register_entity(|id| Recorder {
            state: EntityState::new(id, "recorder"),
            received: received_for_entity,
        });

        sim.send(entity_id, entity_id, 5, EventKind::TaskArrive, Payload::None)
            .unwrap();
        sim.send(entity_id, entity_id, 0, EventKind::TaskComplete, Payload::None)
            .unwrap();
        sim.send(entity_id, entity_id, 5, EventKind::TaskCancel, Payload::None)
            .unwrap();

        sim.run().unwrap();

        let observed = received.borrow().clone();
        assert_eq!(
            observed,
            vec![
                (0, EventKind::TaskComplete),
                (5, EventKind::TaskArrive),
                (5, EventKind::TaskCancel),
            ]
        );
    }

    #[test]
    fn ping_pong_counts_match() {
        let mut sim = Simulation::new();
        let b_id = sim.register_entity(|id| PingPongB {
            state: EntityState::new(id, "b"),
            arrivals: 0,
        });
        let _a_id = sim.register_entity(|id| PingPongA {
            state: EntityState::new(id, "a"),
            peer: b_id,
            delta: 10,
            remaining: 5,
            replies: 0,
        });

        sim.run().unwrap();
    }

    #[test]
    fn negative_delay_is_rejected() {
        let mut sim = Simulation::new();
        let id = sim.register_entity(|id| Recorder {
            state: EntityState::new(id, "r"),
            received: Rc::new(RefCell::new(Vec::new())),
        });
        assert!(sim.send(id, id, -1, EventKind::TaskArrive, Payload::None).is_err());
    }

    #[test]
    fn unknown_destination_is_fatal() {
        let mut sim = Simulation::new();
        let id = sim.register_entity(|id| Recorder {
            state: EntityState::new(id, "r"),
            received: Rc::new(RefCell::new(Vec::new())),
        });
        sim.send(id, EntityId::new(99), 0, EventKind::TaskArrive, Payload::None)
            .unwrap();
        assert!(sim.run().is_err());
    }

    #[test]
    fn span_abruptly_interrupts() {
        let mut sim = Simulation::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let id = sim.register_entity(|id| Recorder {
            state: EntityState::new(id, "r"),
            received: received.clone(),
        });
        sim.send(id, id, 50, EventKind::TaskArrive, Payload::None).unwrap();
        sim.send(id, id, 150, EventKind::TaskArrive, Payload::None).unwrap();
        sim.set_span(100).unwrap();
        sim.run().unwrap();
        assert_eq!(received.borrow().len(), 1);
    }

    #[test]
    fn reset_while_running_is_rejected() {
        let mut sim = Simulation::new();
        sim.clock.start();
        assert!(sim.reset().is_err());
        sim.clock.complete();
        assert!(sim.reset().is_ok());
    }
}
