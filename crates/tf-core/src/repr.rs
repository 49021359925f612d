//! Textual representation of values used in mismatch reports

use std::fmt;

use crate::Value;

/// Write `items` separated by `", "`
fn write_items<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bytes(bytes) => write!(f, "b\"{}\"", bytes.escape_ascii()),
            Value::Date(d) => write!(f, "{}", d),
            Value::DateTime(dt) => write!(f, "{}", dt),
            Value::DateTimeTz(dt) => write!(f, "{}", dt),
            Value::Time(t) => write!(f, "{}", t),
            Value::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Set(items) => {
                f.write_str("{")?;
                write_items(f, items)?;
                f.write_str("}")
            }
            Value::Dict(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Value::Object(obj) => {
                f.write_str(obj.type_name())?;
                let attributes = obj.raw_attributes();
                if attributes.is_empty() {
                    return Ok(());
                }
                f.write_str(" { ")?;
                for (i, (name, value)) in attributes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                f.write_str(" }")
            }
            Value::Subtype(sub) => write!(f, "{}({})", sub.type_name(), sub.base()),
            Value::Generator(_) => f.write_str("<generator>"),
            Value::Placeholder(p) => write!(f, "{}", p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Object;
    use chrono::NaiveDate;

    #[test]
    fn test_scalars() {
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(1.0).to_string(), "1.0");
        assert_eq!(Value::from("a\tb").to_string(), "\"a\\tb\"");
        assert_eq!(Value::Bytes(b"ab\n".to_vec()).to_string(), "b\"ab\\n\"");
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2001, 1, 2).unwrap();
        assert_eq!(Value::from(date).to_string(), "2001-01-02");
        let dt = date.and_hms_opt(3, 4, 5).unwrap();
        assert_eq!(Value::from(dt).to_string(), "2001-01-02 03:04:05");
    }

    #[test]
    fn test_containers() {
        assert_eq!(Value::list([1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::tuple([1]).to_string(), "(1,)");
        assert_eq!(Value::tuple([1, 2]).to_string(), "(1, 2)");
        assert_eq!(Value::set(["a"]).to_string(), "{\"a\"}");
        assert_eq!(Value::dict([("a", 1)]).to_string(), "{\"a\": 1}");
        assert_eq!(Value::list(Vec::<i32>::new()).to_string(), "[]");
    }

    #[test]
    fn test_objects() {
        let point: Value = Object::new("Point").attr("x", 1).attr("y", 2).into();
        assert_eq!(point.to_string(), "Point { x: 1, y: 2 }");
        assert_eq!(Value::from(Object::new("Unit")).to_string(), "Unit");
        assert_eq!(
            Value::subtype("Celsius", 21.5).to_string(),
            "Celsius(21.5)"
        );
        assert_eq!(Value::generator(vec![1]).to_string(), "<generator>");
    }
}
