//! The scheduler family (spec.md §4.5): shared machinery plus five
//! policies built on top of it.

mod aggressive_scheduler;
mod comparator;
mod conservative_scheduler;
mod core;
mod default_scheduler;
mod error;
mod policy;
mod preemption_scheduler;
mod reservation_scheduler;

pub use aggressive_scheduler::AggressiveScheduler;
pub use comparator::{fifo_comparator, hpf_comparator, JobComparator};
pub use conservative_scheduler::ConservativeScheduler;
pub use core::{allocate_resources_to_job, send_job_to_owner, start_job, SchedulerCore};
pub use default_scheduler::DefaultScheduler;
pub use error::SchedulerError;
pub use policy::Scheduler;
pub use preemption_scheduler::PreemptionScheduler;
pub use reservation_scheduler::ReservationScheduler;
