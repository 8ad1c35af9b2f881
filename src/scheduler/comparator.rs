//! Externally configurable orderings over jobs (spec.md §9:
//! "comparator-driven sorts ... must preserve stability by appending the
//! creation serial as the final tie-breaker").

use std::cmp::Ordering;

use crate::workunit::WorkUnit;

pub type JobComparator = Box<dyn Fn(&WorkUnit, &WorkUnit) -> Ordering>;

/// FIFO by submit time, falling back to job id as the stable tie-breaker.
pub fn fifo_comparator() -> JobComparator {
    Box::new(|a, b| a.submit_time.cmp(&b.submit_time).then(a.id.cmp(&b.id)))
}

/// Highest-Priority-First: lower `priority` value runs first (spec.md §3:
/// "priority (lower = higher priority)").
pub fn hpf_comparator() -> JobComparator {
    Box::new(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.submit_time.cmp(&b.submit_time))
            .then(a.id.cmp(&b.id))
    })
}
