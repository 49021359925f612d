//! The `Comparison` placeholder: matches by type and selected attributes

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tf_core::{Placeholder, Value};
use tracing::{debug, trace};

use crate::{CompareError, CompareOptions, CompareResult, Context};

/// Type a [`Comparison`] expects the candidate to have
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// Exact type name
    Type(String),
    /// `a::b::C` path; an unqualified candidate name matches the last segment
    Path { path: String, last: String },
}

impl Target {
    fn name(&self) -> &str {
        match self {
            Target::Type(name) => name,
            Target::Path { path, .. } => path,
        }
    }

    fn accepts(&self, type_name: &str) -> bool {
        match self {
            Target::Type(name) => name == type_name,
            Target::Path { path, last } => {
                let normalized = type_name.replace('.', "::");
                normalized == *path || (!normalized.contains("::") && normalized == *last)
            }
        }
    }
}

/// Outcome of the most recent evaluation, kept for display
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Pending,
    Passed,
    WrongType,
    /// Attribute name to failure text
    Failed(BTreeMap<String, String>),
}

/// A placeholder equal to any value of a type with matching attributes
///
/// Put a `Comparison` on the expected side of a comparison when the exact
/// value is unknown or only some attributes matter:
///
/// ```
/// use tf_compare::{compare_values, Comparison, Object, Value};
///
/// let actual = Object::new("Point").attr("x", 1).attr("y", 2);
/// let expected = Comparison::of("Point").attr("x", 1).strict(false);
/// assert!(compare_values(expected, actual).is_ok());
/// ```
///
/// Equality is one-sided: `Value == Comparison` is always false. After each
/// evaluation the placeholder remembers what failed, and its `Display`
/// shows those failures.
#[derive(Debug, Clone)]
pub struct Comparison {
    target: Target,
    expected: Option<IndexMap<String, Value>>,
    strict: bool,
    state: Rc<RefCell<State>>,
}

impl Comparison {
    /// Expect a value whose type name is `type_name`
    pub fn of(type_name: impl Into<String>) -> Self {
        Self::with_target(Target::Type(type_name.into()))
    }

    /// Expect a value of the type named by a `a::b::C` or `a.b.C` path
    ///
    /// # Errors
    ///
    /// [`CompareError::UnresolvableType`] if the path is empty or any
    /// segment is not an identifier.
    pub fn named(path: &str) -> CompareResult<Self> {
        let segments: Vec<&str> = if path.contains("::") {
            path.split("::").collect()
        } else {
            path.split('.').collect()
        };

        if let Some(bad) = segments.iter().find(|s| !is_identifier(s)) {
            return Err(CompareError::UnresolvableType {
                name: path.to_string(),
                reason: if bad.is_empty() {
                    "empty path segment".to_string()
                } else {
                    format!("'{}' is not an identifier", bad)
                },
            });
        }

        let last = segments.last().copied().unwrap_or_default().to_string();
        Ok(Self::with_target(Target::Path {
            path: segments.join("::"),
            last,
        }))
    }

    /// Expect a value of the same type as `instance`
    ///
    /// An introspectable object's attributes become the expected attributes.
    pub fn like(instance: &Value) -> Self {
        let mut comparison = Self::of(instance.type_name());
        comparison.expected = instance
            .as_object()
            .and_then(|obj| obj.attributes())
            .cloned();
        comparison
    }

    fn with_target(target: Target) -> Self {
        Self {
            target,
            expected: None,
            strict: true,
            state: Rc::new(RefCell::new(State::Pending)),
        }
    }

    /// Add an expected attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.expected
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replace the expected attributes
    pub fn attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.expected = Some(
            attributes
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        );
        self
    }

    /// When true (the default) the candidate must have exactly the expected
    /// attributes; when false only the expected ones are checked
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether the last evaluation failed
    pub fn failed(&self) -> bool {
        matches!(
            *self.state.borrow(),
            State::WrongType | State::Failed(_)
        )
    }

    /// Check `candidate`, recording the result for display
    ///
    /// # Errors
    ///
    /// [`CompareError::NotIntrospectable`] when strict and the candidate
    /// cannot enumerate its attributes. Errors from nested comparers
    /// propagate.
    pub fn matches(&self, candidate: &Value, ctx: &Context<'_>) -> CompareResult<bool> {
        *self.state.borrow_mut() = State::Pending;

        let type_ok = std::iter::once(candidate.type_name())
            .chain(candidate.base_type_names())
            .any(|name| self.target.accepts(name));

        if !type_ok {
            trace!(
                expected = %self.target.name(),
                actual = %candidate.type_name(),
                "Comparison type mismatch"
            );
            *self.state.borrow_mut() = State::WrongType;
            return Ok(false);
        }

        let Some(expected) = &self.expected else {
            *self.state.borrow_mut() = State::Passed;
            return Ok(true);
        };

        let object = candidate.as_object();
        let mut failures = BTreeMap::new();

        if self.strict {
            let actual = object
                .and_then(|obj| obj.attributes())
                .ok_or_else(|| CompareError::NotIntrospectable {
                    type_name: candidate.type_name().to_string(),
                })?;
            for (name, value) in actual {
                if !expected.contains_key(name) {
                    failures.insert(name.clone(), format!("{} not in Comparison", value));
                }
            }
        }

        for (name, expected_value) in expected {
            match object.and_then(|obj| obj.get(name)) {
                None => {
                    failures.insert(name.clone(), format!("{} not in other", expected_value));
                }
                Some(actual_value) => {
                    if ctx.different(expected_value, actual_value)? {
                        failures.insert(
                            name.clone(),
                            format!("{} != {}", expected_value, actual_value),
                        );
                    }
                }
            }
        }

        let passed = failures.is_empty();
        *self.state.borrow_mut() = if passed {
            State::Passed
        } else {
            State::Failed(failures)
        };
        Ok(passed)
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let state = self.state.borrow();
        let tag = match *state {
            State::WrongType | State::Failed(_) => format!("C(failed):{}", self.target.name()),
            State::Pending | State::Passed => format!("C:{}", self.target.name()),
        };

        if let State::WrongType = *state {
            return write!(f, "<{}>wrong type</C>", tag);
        }

        write!(f, "<{}>", tag)?;
        let mut wrote_lines = false;
        if let State::Failed(failures) = &*state {
            for (name, message) in failures {
                write!(f, "\n{:indent$}{}:{}", "", name, message, indent = indent)?;
            }
            wrote_lines = !failures.is_empty();
        } else if let Some(expected) = &self.expected {
            let mut names: Vec<&String> = expected.keys().collect();
            names.sort();
            for name in names {
                write!(f, "\n{:indent$}{}:", "", name, indent = indent)?;
                match expected.get(name) {
                    Some(Value::Placeholder(p)) => {
                        match p.as_any().downcast_ref::<Comparison>() {
                            Some(nested) => nested.render(f, indent + 2)?,
                            None => write!(f, "{}", p)?,
                        }
                    }
                    Some(value) => write!(f, "{}", value)?,
                    None => {}
                }
            }
            wrote_lines = !expected.is_empty();
        }

        if wrote_lines {
            write!(f, "\n{:indent$}", "", indent = indent - 2)?;
        }
        f.write_str("</C>")
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 2)
    }
}

impl Placeholder for Comparison {
    fn type_name(&self) -> &str {
        "Comparison"
    }

    /// Match with default options, for plain `==`
    ///
    /// A usage error, such as a strict comparison against an object that
    /// cannot enumerate its attributes, counts as no match. [`compare`]
    /// reports those errors instead.
    ///
    /// [`compare`]: crate::compare
    fn matches_value(&self, candidate: &Value) -> bool {
        let options = CompareOptions::default();
        let ctx = Context::new(&options);
        self.matches(candidate, &ctx).unwrap_or_else(|err| {
            debug!(error = %err, "Comparison could not be evaluated");
            false
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl PartialEq<Value> for Comparison {
    fn eq(&self, other: &Value) -> bool {
        self.matches_value(other)
    }
}

impl PartialEq<Comparison> for Value {
    fn eq(&self, _other: &Comparison) -> bool {
        false
    }
}

impl From<Comparison> for Value {
    fn from(comparison: Comparison) -> Self {
        Value::placeholder(comparison)
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_core::Object;

    fn point(x: i64, y: i64) -> Value {
        Object::new("Point").attr("x", x).attr("y", y).into()
    }

    fn check(comparison: &Comparison, candidate: &Value) -> CompareResult<bool> {
        let options = CompareOptions::default();
        let ctx = Context::new(&options);
        comparison.matches(candidate, &ctx)
    }

    #[test]
    fn test_type_only() {
        let c = Comparison::of("Point");
        assert!(check(&c, &point(1, 2)).unwrap());
        assert_eq!(c.to_string(), "<C:Point></C>");
    }

    #[test]
    fn test_wrong_type() {
        let c = Comparison::of("Point").attr("x", 1);
        assert!(!check(&c, &Value::from(1)).unwrap());
        assert!(c.failed());
        assert_eq!(c.to_string(), "<C(failed):Point>wrong type</C>");
    }

    #[test]
    fn test_strict_matches_all_attributes() {
        let c = Comparison::of("Point").attr("x", 1).attr("y", 2);
        assert!(check(&c, &point(1, 2)).unwrap());
        assert!(!c.failed());
        assert_eq!(c.to_string(), "<C:Point>\n  x:1\n  y:2\n</C>");
    }

    #[test]
    fn test_strict_records_failures() {
        let c = Comparison::of("Point").attr("x", 1);
        assert!(!check(&c, &point(2, 2)).unwrap());
        assert_eq!(
            c.to_string(),
            "<C(failed):Point>\n  x:1 != 2\n  y:2 not in Comparison\n</C>"
        );
    }

    #[test]
    fn test_non_strict_ignores_extra_attributes() {
        let c = Comparison::of("Point").attr("x", 1).strict(false);
        assert!(check(&c, &point(1, 5)).unwrap());
    }

    #[test]
    fn test_missing_attribute() {
        let c = Comparison::of("Point").attr("z", 3).strict(false);
        assert!(!check(&c, &point(1, 2)).unwrap());
        assert_eq!(c.to_string(), "<C(failed):Point>\n  z:3 not in other\n</C>");
    }

    #[test]
    fn test_strict_requires_introspection() {
        let opaque: Value = Object::opaque("Slotted").attr("x", 1).into();
        let c = Comparison::of("Slotted").attr("x", 1);
        assert_eq!(
            check(&c, &opaque),
            Err(CompareError::NotIntrospectable {
                type_name: "Slotted".to_string()
            })
        );

        let lenient = Comparison::of("Slotted").attr("x", 1).strict(false);
        assert!(check(&lenient, &opaque).unwrap());
    }

    #[test]
    fn test_error_clears_previous_failures() {
        let c = Comparison::of("Handle").attr("fd", 3);
        let stale: Value = Object::new("Handle").attr("fd", 4).into();
        assert!(!check(&c, &stale).unwrap());
        assert!(c.failed());

        let opaque: Value = Object::opaque("Handle").attr("fd", 3).into();
        assert!(check(&c, &opaque).is_err());
        assert!(!c.failed());
        assert_eq!(c.to_string(), "<C:Handle>\n  fd:3\n</C>");
    }

    #[test]
    fn test_plain_equality_treats_usage_error_as_mismatch() {
        let c = Comparison::of("Handle").attr("fd", 3);
        let opaque: Value = Object::opaque("Handle").attr("fd", 3).into();
        assert!(c != opaque);
        assert!(Value::from(c) != opaque);
    }

    #[test]
    fn test_named_paths() {
        let c = Comparison::named("geometry.shapes.Point").unwrap();
        assert!(check(&c, &point(1, 2)).unwrap());
        assert_eq!(c.to_string(), "<C:geometry::shapes::Point></C>");

        let qualified: Value = Object::new("geometry::shapes::Point").into();
        assert!(check(&c, &qualified).unwrap());

        let other: Value = Object::new("other::Point").into();
        assert!(!check(&c, &other).unwrap());
    }

    #[test]
    fn test_named_rejects_bad_paths() {
        assert!(matches!(
            Comparison::named("a..B"),
            Err(CompareError::UnresolvableType { .. })
        ));
        assert!(matches!(
            Comparison::named("a.1B"),
            Err(CompareError::UnresolvableType { .. })
        ));
        assert!(Comparison::named("").is_err());
    }

    #[test]
    fn test_like() {
        let c = Comparison::like(&point(1, 2));
        assert!(check(&c, &point(1, 2)).unwrap());
        assert!(!check(&c, &point(1, 3)).unwrap());
    }

    #[test]
    fn test_attributes_replace() {
        let c = Comparison::like(&point(1, 2)).attributes([("x", 1)]).strict(false);
        assert!(check(&c, &point(1, 9)).unwrap());
    }

    #[test]
    fn test_subtype_matches_base_name() {
        let c = Comparison::of("list");
        assert!(check(&c, &Value::subtype("MyList", vec![1])).unwrap());
    }

    #[test]
    fn test_nested_display() {
        let inner = Comparison::of("Point").attr("x", 1);
        let outer = Comparison::of("Line").attr("start", inner);
        assert_eq!(
            outer.to_string(),
            "<C:Line>\n  start:<C:Point>\n    x:1\n  </C>\n</C>"
        );
    }

    #[test]
    fn test_equality_is_one_sided() {
        let c = Comparison::of("Point").attr("x", 1).attr("y", 2);
        assert!(c == point(1, 2));
        assert!(point(1, 2) != c);
        assert!(Value::from(c.clone()) == point(1, 2));
        assert!(point(1, 2) != Value::from(c));
    }
}
