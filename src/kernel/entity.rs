//! Entity lifecycle: numeric id, name, enabled flag, and dispatch hooks.

use crate::ids::EntityId;

use super::context::KernelContext;
use super::event::Event;

/// Common entity bookkeeping, embedded by every concrete entity (Server,
/// User, ReservationUser, ...) rather than inherited through a class
/// hierarchy — spec.md's design notes call for a tagged/interface style
/// with a shared helper, not deep inheritance.
#[derive(Debug, Clone)]
pub struct EntityState {
    id: EntityId,
    name: String,
    enabled: bool,
}

impl EntityState {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            enabled: true,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// A process-level simulation participant.
///
/// Entities are registered with the kernel before `run`; ids are allocated
/// monotonically by the kernel's own counter (never a process-wide
/// global). `process` is a run-to-completion step: there is no
/// suspension point within a single call.
pub trait Entity: std::fmt::Debug {
    fn state(&self) -> &EntityState;
    fn state_mut(&mut self) -> &mut EntityState;

    fn id(&self) -> EntityId {
        self.state().id()
    }

    fn name(&self) -> &str {
        self.state().name()
    }

    fn is_enabled(&self) -> bool {
        self.state().is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state_mut().set_enabled(enabled);
    }

    /// Called once, before the first tick, in registration order.
    fn on_start(&mut self, _ctx: &mut KernelContext) {}

    /// Handles a single delivered event.
    fn process(&mut self, event: &Event, ctx: &mut KernelContext);

    /// Called once when the simulation terminates.
    fn on_shutdown(&mut self, _ctx: &mut KernelContext) {}
}
