//! Structural comparison with readable mismatch reports
//!
//! [`compare`] checks two [`Value`]s for equality and, when they differ,
//! explains how: which set members are missing, which dict keys changed,
//! where two sequences diverge, or a unified diff of two texts.
//!
//! # Architecture
//!
//! ```text
//!   compare(first, second, options)
//!            │
//!     ┌──────▼──────┐   placeholder?   ┌──────────────┐
//!     │  dispatch   ├─────────────────►│  Comparison  │
//!     └──────┬──────┘                  └──────────────┘
//!            │ type name (+ bases)
//!     ┌──────▼──────┐    miss     ┌─────────────────────┐
//!     │  Registry   ├────────────►│ category fallback   │
//!     └──────┬──────┘             │ set/dict/seq/text/… │
//!            │                    └──────────┬──────────┘
//!            └───────────┬───────────────────┘
//!                 Outcome::Equal | Outcome::Differ(text)
//! ```
//!
//! Comparers receive a [`Context`] and compare nested values through it,
//! so registered comparers, strictness and placeholders apply at any
//! depth.

pub mod comparers;
pub mod comparison;
pub mod context;
pub mod diff;
pub mod engine;
pub mod error;
pub mod options;
pub mod registry;

pub use comparison::Comparison;
pub use context::{Context, Outcome};
pub use diff::{diff, unified_diff};
pub use engine::{compare, compare_values};
pub use error::{CompareError, CompareResult};
pub use options::CompareOptions;
pub use registry::{default_registry, register, Comparer, Registry};

pub use tf_core::{to_value, Generator, Inspect, Object, Subtype, Value};

/// Assert two values are equal, panicking with the mismatch report
///
/// ```
/// use tf_compare::{assert_compare, CompareOptions};
///
/// assert_compare!(vec![1, 2], vec![1, 2]);
/// assert_compare!(1, 1.0, CompareOptions::new());
/// ```
#[macro_export]
macro_rules! assert_compare {
    ($first:expr, $second:expr $(,)?) => {
        $crate::assert_compare!($first, $second, $crate::CompareOptions::default())
    };
    ($first:expr, $second:expr, $options:expr $(,)?) => {
        if let Err(err) = $crate::compare(
            &$crate::Value::from($first),
            &$crate::Value::from($second),
            &$options,
        ) {
            panic!("{}", err);
        }
    };
}
