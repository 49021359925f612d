//! Values that decide equality themselves

use std::any::Any;
use std::fmt;

use crate::Value;

/// A stand-in value embedded in expected data
///
/// A placeholder is only consulted when it is the left-hand side of an
/// equality check. `candidate == placeholder` never calls into it.
pub trait Placeholder: fmt::Debug + fmt::Display {
    /// Type name reported for the placeholder itself
    fn type_name(&self) -> &str;

    /// Whether `candidate` satisfies the placeholder
    fn matches_value(&self, candidate: &Value) -> bool;

    /// Downcasting hook for comparison engines with richer matching
    fn as_any(&self) -> &dyn Any;
}
