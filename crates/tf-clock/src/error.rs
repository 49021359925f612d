//! Error types for clock mocks

use thiserror::Error;

/// Result type for clock operations
pub type ClockResult<T> = Result<T, ClockError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClockError {
    /// Read from a mock with nothing queued and nothing read before
    #[error("no instant queued and no previous instant to advance from")]
    Exhausted,

    /// The next instant or step cannot be represented
    #[error("{instant} advanced by {delta} {unit} is out of range")]
    OutOfRange {
        instant: String,
        delta: i64,
        unit: String,
    },

    /// Constructor arguments do not name a valid instant
    #[error("invalid {kind}: {description}")]
    InvalidInstant {
        kind: &'static str,
        description: String,
    },

    #[error("unknown delta unit: {0}")]
    UnknownUnit(String),
}
