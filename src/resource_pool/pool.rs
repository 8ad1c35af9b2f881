//! Thin façade over a [`Profile`] adding utilisation queries (spec.md §2).

use crate::profile::{Profile, ProfileEntry, TimeWindow};
use crate::range::RangeList;

use super::error::ResourcePoolError;

/// Owns the availability profile for a single server's capacity. Schedulers
/// talk to the pool rather than the profile directly so that the same
/// facade can later grow utilisation reporting without touching callers.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    profile: Profile,
}

impl ResourcePool {
    pub fn new(capacity: i64) -> Result<Self, ResourcePoolError> {
        Ok(Self {
            profile: Profile::new(capacity)?,
        })
    }

    pub fn capacity(&self) -> i64 {
        self.profile.capacity()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    pub fn check_availability(&self, time: i64) -> ProfileEntry {
        self.profile.check_availability(time)
    }

    pub fn check_availability_window(
        &self,
        n: i64,
        start: i64,
        duration: i64,
        allow_less: bool,
    ) -> Option<RangeList> {
        self.profile.check_availability_window(n, start, duration, allow_less)
    }

    pub fn find_start_time(&self, n: i64, ready_time: i64, duration: i64) -> Option<i64> {
        self.profile.find_start_time(n, ready_time, duration)
    }

    pub fn allocate(&mut self, ranges: &RangeList, start: i64, finish: i64) -> Result<(), ResourcePoolError> {
        self.profile.allocate_resource_ranges(ranges, start, finish)?;
        Ok(())
    }

    pub fn release(&mut self, ranges: &RangeList, start: i64, finish: i64) -> Result<(), ResourcePoolError> {
        self.profile.add_time_slot(ranges, start, finish)?;
        Ok(())
    }

    pub fn get_time_slots(&self, start: i64, finish: i64) -> Vec<TimeWindow> {
        self.profile.get_time_slots(start, finish)
    }

    /// Fraction of capacity in use at `time`, in `[0.0, 1.0]`.
    pub fn utilization(&self, time: i64) -> f64 {
        let free = self.profile.check_availability(time).free().num_items();
        let capacity = self.profile.capacity();
        if capacity == 0 {
            return 0.0;
        }
        1.0 - (free as f64 / capacity as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;

    #[test]
    fn fresh_pool_is_fully_idle() {
        let pool = ResourcePool::new(10).unwrap();
        assert_eq!(pool.utilization(0), 0.0);
    }

    #[test]
    fn allocation_raises_utilization() {
        let mut pool = ResourcePool::new(10).unwrap();
        let ranges = RangeList::from(Range::new(0, 4));
        pool.allocate(&ranges, 0, 100).unwrap();
        assert_eq!(pool.utilization(0), 0.5);
    }
}
