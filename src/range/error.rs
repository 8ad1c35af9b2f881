use thiserror::Error;

/// Errors that can occur while building or parsing ranges and range lists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("range begin {begin} is greater than end {end}")]
    BeginAfterEnd { begin: i64, end: i64 },

    #[error("malformed range list literal: {0}")]
    ParseError(String),
}
