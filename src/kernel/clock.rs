//! The virtual clock and the simulation's lifecycle status machine.

/// Simulation lifecycle, spec.md §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimStatus {
    NotStarted,
    Running,
    Paused,
    Complete,
}

/// A strictly monotonic integer virtual clock.
#[derive(Debug, Clone)]
pub struct Clock {
    time: i64,
    status: SimStatus,
    span: Option<i64>,
    warm_up: Option<i64>,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            time: 0,
            status: SimStatus::NotStarted,
            span: None,
            warm_up: None,
        }
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn status(&self) -> SimStatus {
        self.status
    }

    pub fn span(&self) -> Option<i64> {
        self.span
    }

    pub fn set_span(&mut self, span: i64) {
        self.span = Some(span);
    }

    pub fn warm_up(&self) -> Option<i64> {
        self.warm_up
    }

    pub fn set_warm_up(&mut self, mark: i64) {
        self.warm_up = Some(mark);
    }

    pub(super) fn start(&mut self) {
        self.status = SimStatus::Running;
    }

    pub(super) fn pause(&mut self) {
        if self.status == SimStatus::Running {
            self.status = SimStatus::Paused;
        }
    }

    pub(super) fn resume(&mut self) {
        if self.status == SimStatus::Paused {
            self.status = SimStatus::Running;
        }
    }

    pub(super) fn complete(&mut self) {
        self.status = SimStatus::Complete;
    }

    /// Resets the clock to `NOT_STARTED`. The caller is responsible for
    /// rejecting this while `Running` (spec.md §7: "reset while running").
    pub(super) fn reset(&mut self) {
        self.time = 0;
        self.status = SimStatus::NotStarted;
        self.span = None;
        self.warm_up = None;
    }

    /// Advances the clock to `new_time`, which must be `>= time()`.
    pub(super) fn advance_to(&mut self, new_time: i64) -> Result<(), (i64, i64)> {
        if new_time < self.time {
            return Err((self.time, new_time));
        }
        self.time = new_time;
        Ok(())
    }

    /// Returns true if the span was configured and has been reached or
    /// exceeded.
    pub fn span_exhausted(&self) -> bool {
        self.span.is_some_and(|span| self.time >= span)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_started_at_time_zero() {
        let clock = Clock::new();
        assert_eq!(clock.time(), 0);
        assert_eq!(clock.status(), SimStatus::NotStarted);
    }

    #[test]
    fn advance_rejects_the_past() {
        let mut clock = Clock::new();
        clock.advance_to(10).unwrap();
        assert!(clock.advance_to(5).is_err());
    }

    #[test]
    fn span_exhausted_only_after_reaching_span() {
        let mut clock = Clock::new();
        clock.set_span(100);
        assert!(!clock.span_exhausted());
        clock.advance_to(100).unwrap();
        assert!(clock.span_exhausted());
    }

    #[test]
    fn reset_clears_time_and_status() {
        let mut clock = Clock::new();
        clock.start();
        clock.advance_to(50).unwrap();
        clock.complete();
        clock.reset();
        assert_eq!(clock.time(), 0);
        assert_eq!(clock.status(), SimStatus::NotStarted);
    }
}
