use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    #[error("day must be 0 (Monday) through 6 (Sunday), got {0}")]
    InvalidDay(u8),

    #[error("hour must be 0..=24, got {0}")]
    InvalidHour(u8),
}
