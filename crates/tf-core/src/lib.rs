//! Core value model for testfixtures
//!
//! Every comparison in the workspace operates on [`Value`], a closed set of
//! runtime shapes that test code can build from plain Rust data:
//!
//! - scalars (`None`, bools, integers, floats, strings, bytes)
//! - `chrono` dates, datetimes and times
//! - containers (lists, tuples, sets, dicts)
//! - named [`Object`]s with attributes, and [`Subtype`]s of builtin values
//! - single-pass [`Generator`]s
//! - [`Placeholder`]s that decide equality themselves
//!
//! Values can be constructed with `From` impls, the builders on [`Value`],
//! the [`Inspect`] trait, or from any `serde::Serialize` type via
//! [`to_value`].
//!
//! # Example
//!
//! ```
//! use tf_core::{Object, Value};
//!
//! let point: Value = Object::new("Point").attr("x", 1).attr("y", 2).into();
//! assert_eq!(point.type_name(), "Point");
//! assert_eq!(point.to_string(), "Point { x: 1, y: 2 }");
//! ```

mod error;
mod generator;
mod inspect;
mod object;
mod placeholder;
mod repr;
mod ser;
mod value;

pub use error::{ValueError, ValueResult};
pub use generator::Generator;
pub use inspect::Inspect;
pub use object::{Object, Subtype};
pub use placeholder::Placeholder;
pub use ser::to_value;
pub use value::{Category, Value};

/// Type names of the builtin value shapes
pub mod types {
    pub const NONE: &str = "none";
    pub const BOOL: &str = "bool";
    pub const INT: &str = "int";
    pub const FLOAT: &str = "float";
    pub const STR: &str = "str";
    pub const BYTES: &str = "bytes";
    pub const DATE: &str = "date";
    pub const DATETIME: &str = "datetime";
    pub const TIME: &str = "time";
    pub const LIST: &str = "list";
    pub const TUPLE: &str = "tuple";
    pub const SET: &str = "set";
    pub const DICT: &str = "dict";
    pub const GENERATOR: &str = "generator";
}
