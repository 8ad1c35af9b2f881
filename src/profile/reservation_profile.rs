//! The parallel profile backing advance reservations (spec.md §4.5.5).
//!
//! Unlike the main profile, a `ReservationProfile` starts *fully
//! allocated* — no resources are free until a reservation is accepted.
//! Accepting a reservation over `[start, finish)` releases its assigned
//! `RangeList` into this profile; cancelling re-allocates it. Jobs tagged
//! with a reservation id query this profile (intersected with the
//! reservation's own ranges) instead of the main profile.

use crate::range::RangeList;

use super::error::ProfileError;
use super::profile::Profile;

#[derive(Debug, Clone)]
pub struct ReservationProfile {
    inner: Profile,
}

impl ReservationProfile {
    pub fn new(capacity: i64) -> Result<Self, ProfileError> {
        Ok(Self {
            inner: Profile::new_fully_allocated(capacity)?,
        })
    }

    /// Grants `ranges` over `[start, finish)` to the reservation pool (the
    /// window becomes queryable by jobs tagged with this reservation).
    pub fn grant(&mut self, ranges: &RangeList, start: i64, finish: i64) -> Result<(), ProfileError> {
        self.inner.add_time_slot(ranges, start, finish)
    }

    /// Revokes a previously granted window, restoring the fully-allocated
    /// state (used on reservation cancellation).
    pub fn revoke(&mut self, ranges: &RangeList, start: i64, finish: i64) -> Result<(), ProfileError> {
        self.inner.allocate_resource_ranges(ranges, start, finish)
    }

    /// Checks availability for `n` resources over `[start, start +
    /// duration)`, restricted to `reservation_ranges` (the reservation's
    /// own assigned indices).
    pub fn check_availability_window(
        &self,
        reservation_ranges: &RangeList,
        n: i64,
        start: i64,
        duration: i64,
    ) -> Option<RangeList> {
        let free = self
            .inner
            .check_availability_window(0, start, duration, true)?;
        let scoped = free.intersection(reservation_ranges);
        (scoped.num_items() >= n).then_some(scoped)
    }

    /// Allocates `ranges` (a subset of a reservation's own ranges) to a job
    /// running within the reservation's window.
    pub fn allocate_resource_ranges(
        &mut self,
        ranges: &RangeList,
        start: i64,
        finish: i64,
    ) -> Result<(), ProfileError> {
        self.inner.allocate_resource_ranges(ranges, start, finish)
    }

    /// Releases resources a job held within the reservation's window.
    pub fn add_time_slot(&mut self, ranges: &RangeList, start: i64, finish: i64) -> Result<(), ProfileError> {
        self.inner.add_time_slot(ranges, start, finish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;

    fn rl(ranges: &[(i64, i64)]) -> RangeList {
        RangeList::from(ranges.iter().map(|&(b, e)| Range::new(b, e)).collect::<Vec<_>>())
    }

    #[test]
    fn starts_fully_allocated() {
        let profile = ReservationProfile::new(10).unwrap();
        assert_eq!(
            profile
                .check_availability_window(&rl(&[(0, 9)]), 1, 0, 10),
            None
        );
    }

    #[test]
    fn grant_then_query_then_revoke() {
        let mut profile = ReservationProfile::new(10).unwrap();
        let window = rl(&[(0, 3)]);
        profile.grant(&window, 100, 200).unwrap();

        let available = profile
            .check_availability_window(&window, 4, 100, 50)
            .unwrap();
        assert_eq!(available, window);

        profile.revoke(&window, 100, 200).unwrap();
        assert_eq!(profile.check_availability_window(&window, 1, 100, 50), None);
    }

    #[test]
    fn job_inside_reservation_allocates_and_releases() {
        let mut profile = ReservationProfile::new(10).unwrap();
        let window = rl(&[(0, 3)]);
        profile.grant(&window, 100, 200).unwrap();

        profile.allocate_resource_ranges(&window, 100, 150).unwrap();
        assert_eq!(
            profile.check_availability_window(&window, 1, 100, 50),
            None
        );
        profile.add_time_slot(&window, 100, 150).unwrap();
        assert_eq!(
            profile.check_availability_window(&window, 4, 100, 100),
            Some(window)
        );
    }
}
