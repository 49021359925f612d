//! Error types for comparisons

use thiserror::Error;

/// Result type for comparison operations
pub type CompareResult<T> = Result<T, CompareError>;

/// Errors produced by the comparison engine
///
/// `NotEqual` is the expected failure of an assertion; every other variant
/// signals a misconfigured test rather than a data mismatch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompareError {
    /// The values differ; the message is the rendered explanation
    #[error("{message}")]
    NotEqual { message: String },

    /// Strict placeholder used against a value that cannot list its attributes
    #[error("{type_name} does not support attribute introspection so cannot do strict comparison")]
    NotIntrospectable { type_name: String },

    /// A type name given as a path could not be resolved
    #[error("'{name}' could not be resolved: {reason}")]
    UnresolvableType { name: String, reason: String },

    /// A registered comparer was called with inputs it cannot handle
    #[error("comparer for {type_name} failed: {message}")]
    Comparer { type_name: String, message: String },
}

impl CompareError {
    /// The mismatch explanation, if this is a `NotEqual` error
    pub fn mismatch(&self) -> Option<&str> {
        match self {
            CompareError::NotEqual { message } => Some(message),
            _ => None,
        }
    }
}
