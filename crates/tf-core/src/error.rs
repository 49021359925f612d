//! Error types for building values

use std::fmt::Display;
use thiserror::Error;

/// Result type for value conversions
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors that can occur while converting data into a [`crate::Value`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    /// Integer does not fit the value model
    #[error("integer {value} is out of range")]
    IntegerOutOfRange { value: String },

    /// Map key was serialized without a matching value (or the reverse)
    #[error("map entry is missing its {0}")]
    IncompleteMapEntry(&'static str),

    /// Error raised by a `Serialize` implementation
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for ValueError {
    fn custom<T: Display>(msg: T) -> Self {
        ValueError::Custom(msg.to_string())
    }
}
