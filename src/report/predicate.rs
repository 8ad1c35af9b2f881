//! Predicates selecting which jobs a report covers.

use crate::workunit::{Status, WorkUnit};

pub type JobPredicate = Box<dyn Fn(&WorkUnit) -> bool>;

pub fn all() -> JobPredicate {
    Box::new(|_| true)
}

pub fn with_status(status: Status) -> JobPredicate {
    Box::new(move |job| job.status == status)
}

pub fn finished_after(time: i64) -> JobPredicate {
    Box::new(move |job| job.finish_time.is_some_and(|finish| finish > time))
}

pub fn owned_by(owner: crate::ids::EntityId) -> JobPredicate {
    Box::new(move |job| job.owner == owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{EntityId, JobId};

    fn unit() -> WorkUnit {
        WorkUnit::new(JobId::new(1), EntityId::new(0), 0, 100, 4, 0)
    }

    #[test]
    fn all_accepts_everything() {
        assert!(all()(&unit()));
    }

    #[test]
    fn with_status_matches_only_that_status() {
        let job = unit();
        assert!(with_status(Status::Unknown)(&job));
        assert!(!with_status(Status::Complete)(&job));
    }
}
