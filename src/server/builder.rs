//! `ServerBuilder`: the builder surface of spec.md §6.

use crate::availability_calendar::AvailabilityCalendar;
use crate::ids::{EntityId, JobId};
use crate::kernel::EntityState;
use crate::resource_pool::ResourcePool;
use crate::scheduler::Scheduler;
use crate::workunit::Status;

use super::error::ServerError;
use super::server::Server;

/// Builds a [`Server`]: name, scheduler (default per `S::default()`,
/// typically [`crate::scheduler::DefaultScheduler`]), resource availability
/// (default = always `1.0`), resource pool (default = a fresh pool sized to
/// `capacity`), capacity (`>= 1`), and a work-unit status listener.
pub struct ServerBuilder<S: Scheduler + Default> {
    name: String,
    capacity: i64,
    pool: Option<ResourcePool>,
    scheduler: Option<S>,
    calendar: Option<AvailabilityCalendar>,
    listener: Option<Box<dyn FnMut(JobId, Status, Status)>>,
}

impl<S: Scheduler + Default> ServerBuilder<S> {
    pub fn new(capacity: i64) -> Self {
        Self {
            name: "server".to_string(),
            capacity,
            pool: None,
            scheduler: None,
            calendar: None,
            listener: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn scheduler(mut self, scheduler: S) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn pool(mut self, pool: ResourcePool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn availability(mut self, calendar: AvailabilityCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn listener(mut self, listener: Box<dyn FnMut(JobId, Status, Status)>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn build(self, id: EntityId) -> Result<Server<S>, ServerError> {
        if self.capacity < 1 {
            return Err(ServerError::InvalidCapacity(self.capacity));
        }
        let pool = match self.pool {
            Some(pool) => pool,
            None => ResourcePool::new(self.capacity)?,
        };
        let mut scheduler = self.scheduler.unwrap_or_default();
        if let Some(listener) = self.listener {
            scheduler.set_listener(listener);
        }
        Ok(Server::from_parts(EntityState::new(id, self.name), pool, scheduler, self.calendar))
    }
}
