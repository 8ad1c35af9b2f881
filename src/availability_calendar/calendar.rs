//! Week-of-day resource availability modulation (spec.md §6 collaborator).

use super::error::CalendarError;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    start_hour: u8,
    end_hour: u8,
    fraction: f64,
}

/// Per-day-of-week availability fraction, default `1.0` everywhere. `day`
/// indices follow `0 = Monday .. 6 = Sunday`.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityCalendar {
    days: [Vec<Span>; 7],
}

impl AvailabilityCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `fraction` availability for `day` within `[start_hour,
    /// end_hour)`. `start_hour == end_hour` denotes the whole day rather
    /// than an empty span — this resolves spec.md §9's open question about
    /// the source helper rejecting that span.
    pub fn set_availability(
        &mut self,
        day: u8,
        start_hour: u8,
        end_hour: u8,
        fraction: f64,
    ) -> Result<(), CalendarError> {
        if day > 6 {
            return Err(CalendarError::InvalidDay(day));
        }
        if start_hour > 24 || end_hour > 24 {
            return Err(CalendarError::InvalidHour(start_hour.max(end_hour)));
        }
        let (start_hour, end_hour) = if start_hour == end_hour {
            (0, 24)
        } else {
            (start_hour, end_hour)
        };
        if start_hour > end_hour {
            return Err(CalendarError::InvalidHour(start_hour));
        }
        self.days[day as usize].push(Span {
            start_hour,
            end_hour,
            fraction,
        });
        Ok(())
    }

    /// Availability fraction at simulation `time`, treating one time unit
    /// as one hour and `time == 0` as the start of day 0. Hours with no
    /// configured span default to full availability.
    pub fn availability_at(&self, time: i64) -> f64 {
        if time < 0 {
            return 1.0;
        }
        let day = ((time / 24) % 7) as usize;
        let hour = (time % 24) as u8;
        self.days[day]
            .iter()
            .find(|span| hour >= span.start_hour && hour < span.end_hour)
            .map(|span| span.fraction)
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_hour_defaults_to_full_availability() {
        let calendar = AvailabilityCalendar::new();
        assert_eq!(calendar.availability_at(10), 1.0);
    }

    #[test]
    fn whole_day_span_covers_every_hour() {
        let mut calendar = AvailabilityCalendar::new();
        calendar.set_availability(0, 5, 5, 0.5).unwrap();
        assert_eq!(calendar.availability_at(0), 0.5);
        assert_eq!(calendar.availability_at(23), 0.5);
    }

    #[test]
    fn partial_span_only_covers_its_hours() {
        let mut calendar = AvailabilityCalendar::new();
        calendar.set_availability(0, 9, 17, 0.25).unwrap();
        assert_eq!(calendar.availability_at(9), 0.25);
        assert_eq!(calendar.availability_at(8), 1.0);
        assert_eq!(calendar.availability_at(17), 1.0);
    }

    #[test]
    fn out_of_range_day_is_rejected() {
        let mut calendar = AvailabilityCalendar::new();
        assert!(calendar.set_availability(7, 0, 24, 1.0).is_err());
    }
}
