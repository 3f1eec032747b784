use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("type must be one of: tracks, artists, albums (got {0:?})")]
    InvalidItemType(String),
    #[error("time_range must be one of: short_term, medium_term, long_term (got {0:?})")]
    InvalidTimeRange(String),
    #[error("limit must be between {min} and {max} (got {value})")]
    LimitOutOfRange { value: i64, min: u8, max: u8 },
    #[error("limit is not an integer: {0:?}")]
    LimitNotInteger(String),
    #[error("unrecognised timestamp: {0:?}")]
    InvalidTimestamp(String),
}
