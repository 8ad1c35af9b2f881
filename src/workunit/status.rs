//! The authoritative work-unit status machine (spec.md §4.5.6).

/// Lifecycle status of a [`super::WorkUnit`]. Transitions are monotonic:
/// cycles are forbidden and enforced by [`Status::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Unknown,
    Enqueued,
    Waiting,
    Paused,
    InExecution,
    Complete,
    Cancelled,
    Failed,
}

impl Status {
    /// Whether moving from `self` to `target` is allowed by the table.
    pub fn can_transition_to(self, target: Status) -> bool {
        use Status::*;
        match target {
            Enqueued => matches!(self, Unknown),
            Waiting => matches!(self, Enqueued),
            InExecution => matches!(self, Enqueued | Waiting | Paused),
            Paused => matches!(self, InExecution),
            Complete => matches!(self, InExecution | Paused),
            Cancelled => matches!(self, Enqueued | Waiting | InExecution | Paused),
            Failed => matches!(self, Enqueued | Waiting | InExecution | Paused),
            Unknown => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Complete | Status::Cancelled | Status::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueued_only_from_unknown() {
        assert!(Status::Unknown.can_transition_to(Status::Enqueued));
        assert!(!Status::Waiting.can_transition_to(Status::Enqueued));
    }

    #[test]
    fn in_execution_resumes_from_paused() {
        assert!(Status::Paused.can_transition_to(Status::InExecution));
        assert!(Status::Waiting.can_transition_to(Status::InExecution));
        assert!(!Status::Complete.can_transition_to(Status::InExecution));
    }

    #[test]
    fn terminal_states_reject_further_transitions() {
        assert!(!Status::Complete.can_transition_to(Status::Waiting));
        assert!(Status::Complete.is_terminal());
        assert!(!Status::Waiting.is_terminal());
    }
}
