//! clustersim - a discrete-event cluster job-scheduling simulator.
//!
//! Kernel, availability profile, and a pluggable scheduler family
//! (FCFS, preemptive priority, conservative backfilling, aggressive/EASY
//! backfilling, reservation + conservative backfilling) over a single
//! logical clock. No real parallelism, persistence, network I/O,
//! wall-clock accuracy, or fairness beyond a policy's own guarantees.
//!
//! # Glossary
//!
//! - **Anchor entry**: profile entry at the start time of an allocation;
//!   pins the pre-allocation state.
//! - **Backfilling**: running later-arriving jobs ahead of earlier ones if
//!   doing so does not violate the policy's delay invariant.
//! - **Pivot**: in aggressive backfilling, the one job at the head of the
//!   waiting queue whose reserved start time no backfilled job is allowed
//!   to delay.
//! - **Profile**: time-indexed mapping from instants to the free resource
//!   set valid from that instant until the next entry.
//! - **Range**: closed integer interval of resource indices.
//! - **Reservation**: immovable advance booking of resources over a fixed
//!   future window.
//! - **Tick**: one iteration of the dispatch loop; delivers all events at
//!   the earliest `time` present in the future queue.
//! - **Work unit**: anything scheduled on resources (job or reservation) -
//!   has identity, duration, required count, status.

pub mod availability_calendar;
pub mod config;
pub mod error;
pub mod ids;
pub mod kernel;
pub mod logging;
pub mod profile;
pub mod range;
pub mod report;
pub mod resource_pool;
pub mod scheduler;
pub mod server;
pub mod workload;
pub mod workunit;

pub use error::ClusterSimError;

/// An opaque external correlation token (reservation confirmations, job
/// submission receipts) distinct from the kernel's dense internal ids.
pub type ExternalToken = String;

/// Generates a new unique external token (UUID v4), mirroring the
/// teacher's own `generate_id` helper.
pub fn generate_external_token() -> ExternalToken {
    uuid::Uuid::new_v4().to_string()
}
