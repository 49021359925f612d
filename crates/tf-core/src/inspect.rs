//! Conversion of user types into values

use crate::Value;

/// Types that can describe themselves as a [`Value`]
///
/// Implement this for domain types that should take part in structural
/// comparisons. Returning an introspectable [`crate::Object`] lets strict
/// placeholders enumerate the type's attributes.
///
/// ```
/// use tf_core::{Inspect, Object, Value};
///
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Inspect for Point {
///     fn describe(&self) -> Value {
///         Object::new("Point").attr("x", self.x).attr("y", self.y).into()
///     }
/// }
///
/// assert_eq!(Point { x: 1, y: 2 }.describe().to_string(), "Point { x: 1, y: 2 }");
/// ```
pub trait Inspect {
    fn describe(&self) -> Value;
}

impl Inspect for Value {
    fn describe(&self) -> Value {
        self.clone()
    }
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn describe(&self) -> Value {
        (**self).describe()
    }
}

impl<T: Inspect> Inspect for [T] {
    fn describe(&self) -> Value {
        Value::List(self.iter().map(Inspect::describe).collect())
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn describe(&self) -> Value {
        self.as_slice().describe()
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn describe(&self) -> Value {
        self.as_ref().map(Inspect::describe).unwrap_or(Value::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Object;

    struct Reading {
        sensor: &'static str,
        value: f64,
    }

    impl Inspect for Reading {
        fn describe(&self) -> Value {
            Object::new("Reading")
                .attr("sensor", self.sensor)
                .attr("value", self.value)
                .into()
        }
    }

    #[test]
    fn test_describe_collection() {
        let readings = vec![Reading {
            sensor: "temp",
            value: 21.5,
        }];
        assert_eq!(
            readings.describe().to_string(),
            "[Reading { sensor: \"temp\", value: 21.5 }]"
        );
    }

    #[test]
    fn test_describe_option() {
        let missing: Option<Reading> = None;
        assert_eq!(missing.describe(), Value::None);

        let present = Some(Reading {
            sensor: "door",
            value: 1.0,
        });
        assert_eq!(present.describe().type_name(), "Reading");
    }
}
