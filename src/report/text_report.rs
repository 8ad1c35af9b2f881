//! Plain-text job reports (spec.md §6 collaborator).

use std::fmt::Write as _;

use crate::workunit::WorkUnit;

use super::predicate::JobPredicate;

/// Renders one line per job matching `predicate`, in the order given.
pub fn format_report(jobs: &[WorkUnit], predicate: &JobPredicate) -> String {
    let mut out = String::new();
    for job in jobs.iter().filter(|job| predicate(job)) {
        let _ = writeln!(
            out,
            "{}\towner={}\tstatus={:?}\tsubmit={}\tstart={}\tfinish={}",
            job.id,
            job.owner,
            job.status,
            job.submit_time,
            job.start_time.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string()),
            job.finish_time.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string()),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{EntityId, JobId};
    use crate::report::predicate::all;

    #[test]
    fn one_line_per_matching_job() {
        let jobs = vec![
            WorkUnit::new(JobId::new(1), EntityId::new(0), 0, 100, 4, 0),
            WorkUnit::new(JobId::new(2), EntityId::new(0), 5, 50, 2, 1),
        ];
        let report = format_report(&jobs, &all());
        assert_eq!(report.lines().count(), 2);
        assert!(report.contains("job#1"));
        assert!(report.contains("job#2"));
    }

    #[test]
    fn empty_job_list_yields_empty_report() {
        let report = format_report(&[], &all());
        assert!(report.is_empty());
    }
}
