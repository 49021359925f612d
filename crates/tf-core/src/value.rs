//! The dynamic value type

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;

use crate::types;
use crate::{Generator, Object, Placeholder, Subtype};

/// A runtime value that can be compared structurally
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeTz(DateTime<FixedOffset>),
    Time(NaiveTime),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Unordered collection; duplicates are removed on construction
    Set(Vec<Value>),
    /// Insertion ordered key/value pairs with unique keys
    Dict(Vec<(Value, Value)>),
    Object(Object),
    Subtype(Subtype),
    Generator(Generator),
    Placeholder(Rc<dyn Placeholder>),
}

/// Structural category used to pick a default comparer
///
/// Categories are probed in declaration order; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Set,
    Mapping,
    Sequence,
    Text,
    Generic,
}

impl Value {
    /// Build a set, dropping duplicate elements
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    /// Build a dict; later duplicates of a key replace earlier values
    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut pairs: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match pairs.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => pairs.push((key, value)),
            }
        }
        Value::Dict(pairs)
    }

    /// Build a list
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a tuple
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a subtype of `base` named `type_name`
    pub fn subtype(type_name: impl Into<String>, base: impl Into<Value>) -> Self {
        Value::Subtype(Subtype::new(type_name, base))
    }

    /// Build a generator over `items`
    pub fn generator<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
        T: Into<Value> + 'static,
    {
        Value::Generator(Generator::new(items))
    }

    /// Wrap a placeholder
    pub fn placeholder(placeholder: impl Placeholder + 'static) -> Self {
        Value::Placeholder(Rc::new(placeholder))
    }

    /// Name of the value's runtime type
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => types::NONE,
            Value::Bool(_) => types::BOOL,
            Value::Int(_) => types::INT,
            Value::Float(_) => types::FLOAT,
            Value::Str(_) => types::STR,
            Value::Bytes(_) => types::BYTES,
            Value::Date(_) => types::DATE,
            Value::DateTime(_) | Value::DateTimeTz(_) => types::DATETIME,
            Value::Time(_) => types::TIME,
            Value::List(_) => types::LIST,
            Value::Tuple(_) => types::TUPLE,
            Value::Set(_) => types::SET,
            Value::Dict(_) => types::DICT,
            Value::Object(obj) => obj.type_name(),
            Value::Subtype(sub) => sub.type_name(),
            Value::Generator(_) => types::GENERATOR,
            Value::Placeholder(p) => p.type_name(),
        }
    }

    /// Type names of the value's bases, nearest first
    pub fn base_type_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = self;
        while let Value::Subtype(sub) = current {
            current = sub.base();
            names.push(current.type_name());
        }
        names
    }

    /// Whether the value's type is `type_name` or derives from it
    pub fn is_instance_of(&self, type_name: &str) -> bool {
        self.type_name() == type_name || self.base_type_names().contains(&type_name)
    }

    /// The innermost builtin value beneath any subtype wrappers
    pub fn base(&self) -> &Value {
        let mut current = self;
        while let Value::Subtype(sub) = current {
            current = sub.base();
        }
        current
    }

    /// Structural category, probed in fixed precedence order
    pub fn category(&self) -> Category {
        match self.base() {
            Value::Set(_) => Category::Set,
            Value::Dict(_) => Category::Mapping,
            Value::List(_) | Value::Tuple(_) | Value::Generator(_) => Category::Sequence,
            Value::Str(_) => Category::Text,
            _ => Category::Generic,
        }
    }

    /// The object beneath any subtype wrappers, if there is one
    pub fn as_object(&self) -> Option<&Object> {
        match self.base() {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// String contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self.base() {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value is a generator
    pub fn is_generator(&self) -> bool {
        matches!(self.base(), Value::Generator(_))
    }

    /// Items produced by iterating the value, or `None` if it is not iterable
    ///
    /// Dicts yield their keys, strings yield one-character strings and
    /// generators are drained.
    pub fn iter_items(&self) -> Option<Vec<Value>> {
        match self.base() {
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => Some(items.clone()),
            Value::Dict(pairs) => Some(pairs.iter().map(|(k, _)| k.clone()).collect()),
            Value::Str(s) => Some(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            Value::Bytes(bytes) => Some(bytes.iter().map(|b| Value::Int(i64::from(*b))).collect()),
            Value::Generator(generator) => Some(generator.drain()),
            _ => None,
        }
    }

    /// Look up a dict entry by key
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self.base() {
            Value::Dict(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Ordering between two values, when they are mutually orderable
    ///
    /// Numbers compare numerically across int and float; sequences compare
    /// lexicographically. Mixed shapes have no ordering.
    pub fn try_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self.base(), other.base()) {
            (Value::None, Value::None) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::DateTimeTz(a), Value::DateTimeTz(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.try_cmp(y)? {
                        Ordering::Equal => continue,
                        ordering => return Some(ordering),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }

    /// Sort references in place when every pair of elements is orderable
    ///
    /// Returns `false` and leaves the order untouched otherwise.
    pub fn sort_if_orderable(items: &mut [&Value]) -> bool {
        let orderable = items.iter().enumerate().all(|(i, a)| {
            items[i + 1..].iter().all(|b| a.try_cmp(b).is_some())
        });
        if orderable {
            items.sort_by(|a, b| a.try_cmp(b).unwrap_or(Ordering::Equal));
        }
        orderable
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Placeholder(p), _) => p.matches_value(other),
            (_, Value::Placeholder(_)) => false,
            (Value::Subtype(a), _) => a.base() == other,
            (_, Value::Subtype(b)) => self == b.base(),
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::DateTimeTz(a), Value::DateTimeTz(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, value)| other.get(key).is_some_and(|v| value == v))
            }
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Generator(a), Value::Generator(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Value::Int)
            .unwrap_or(Value::Float(value as f64))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::from(value as u64)
    }
}

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::DateTimeTz(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTimeTz(value.fixed_offset())
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<Subtype> for Value {
    fn from(value: Subtype) -> Self {
        Value::Subtype(value)
    }
}

impl From<Generator> for Value {
    fn from(value: Generator) -> Self {
        Value::Generator(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::None)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::list(value)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(value: [T; N]) -> Self {
        Value::list(value)
    }
}

impl<T: Into<Value>> From<HashSet<T>> for Value {
    fn from(value: HashSet<T>) -> Self {
        Value::set(value)
    }
}

impl<T: Into<Value>> From<BTreeSet<T>> for Value {
    fn from(value: BTreeSet<T>) -> Self {
        Value::set(value)
    }
}

impl<K: Into<Value>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(value: HashMap<K, V>) -> Self {
        Value::dict(value)
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(value: BTreeMap<K, V>) -> Self {
        Value::dict(value)
    }
}

impl<K: Into<Value>, V: Into<Value>> From<IndexMap<K, V>> for Value {
    fn from(value: IndexMap<K, V>) -> Self {
        Value::dict(value)
    }
}

macro_rules! impl_from_tuple {
    ($($ty:ident => $var:ident),+) => {
        impl<$($ty: Into<Value>),+> From<($($ty,)+)> for Value {
            fn from(($($var,)+): ($($ty,)+)) -> Self {
                Value::Tuple(vec![$($var.into()),+])
            }
        }
    };
}

impl_from_tuple!(A => a);
impl_from_tuple!(A => a, B => b);
impl_from_tuple!(A => a, B => b, C => c);
impl_from_tuple!(A => a, B => b, C => c, D => d);
impl_from_tuple!(A => a, B => b, C => c, D => d, E => e);

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::list(items),
            serde_json::Value::Object(map) => Value::Dict(
                map.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::None.type_name(), "none");
        assert_eq!(Value::from(1).type_name(), "int");
        assert_eq!(Value::from("a").type_name(), "str");
        assert_eq!(Value::from((1, 2)).type_name(), "tuple");
        assert_eq!(Value::set([1]).type_name(), "set");
        assert_eq!(Value::subtype("OrderedDict", Value::dict([("a", 1)])).type_name(), "OrderedDict");
    }

    #[test]
    fn test_base_type_names() {
        let nested = Value::subtype("Outer", Value::subtype("Inner", vec![1]));
        assert_eq!(nested.base_type_names(), vec!["Inner", "list"]);
        assert!(nested.is_instance_of("list"));
        assert!(nested.is_instance_of("Outer"));
        assert!(!nested.is_instance_of("dict"));
        assert_eq!(nested.category(), Category::Sequence);
    }

    #[test]
    fn test_categories() {
        assert_eq!(Value::set([1, 2]).category(), Category::Set);
        assert_eq!(Value::dict([(1, 2)]).category(), Category::Mapping);
        assert_eq!(Value::from(vec![1]).category(), Category::Sequence);
        assert_eq!(Value::generator(vec![1]).category(), Category::Sequence);
        assert_eq!(Value::from("text").category(), Category::Text);
        assert_eq!(Value::from(1.5).category(), Category::Generic);
    }

    #[test]
    fn test_set_removes_duplicates() {
        let set = Value::set([1, 2, 2, 1]);
        assert_eq!(set, Value::Set(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_set_equality_is_unordered() {
        assert_eq!(Value::set([1, 2, 3]), Value::set([3, 1, 2]));
        assert_ne!(Value::set([1, 2]), Value::set([1, 2, 3]));
    }

    #[test]
    fn test_dict_equality_is_unordered() {
        let a = Value::dict([("x", 1), ("y", 2)]);
        let b = Value::dict([("y", 2), ("x", 1)]);
        assert_eq!(a, b);
        assert_ne!(a, Value::dict([("x", 1), ("y", 3)]));
    }

    #[test]
    fn test_dict_duplicate_keys_replace() {
        let d = Value::dict([("x", 1), ("x", 2)]);
        assert_eq!(d.get(&Value::from("x")), Some(&Value::Int(2)));
    }

    #[test]
    fn test_numeric_equality_across_types() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Int(1), Value::Float(1.5));
    }

    #[test]
    fn test_list_and_tuple_differ() {
        assert_ne!(Value::list([1, 2]), Value::tuple([1, 2]));
    }

    #[test]
    fn test_subtype_equals_base() {
        let sub = Value::subtype("MyList", vec![1, 2]);
        assert_eq!(sub, Value::list([1, 2]));
        assert_eq!(Value::list([1, 2]), sub);
    }

    #[test]
    fn test_try_cmp() {
        assert_eq!(Value::from(1).try_cmp(&Value::from(2.5)), Some(Ordering::Less));
        assert_eq!(Value::from("b").try_cmp(&Value::from("a")), Some(Ordering::Greater));
        assert_eq!(Value::from(1).try_cmp(&Value::from("a")), None);
        assert_eq!(
            Value::from((1, 2)).try_cmp(&Value::from((1, 3))),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_sort_if_orderable() {
        let (a, b, c) = (Value::from(3), Value::from(1), Value::from(2));
        let mut items = vec![&a, &b, &c];
        assert!(Value::sort_if_orderable(&mut items));
        assert_eq!(items, vec![&b, &c, &a]);

        let (x, y) = (Value::from("x"), Value::from(1));
        let mut mixed = vec![&x, &y];
        assert!(!Value::sort_if_orderable(&mut mixed));
        assert_eq!(mixed, vec![&x, &y]);
    }

    #[test]
    fn test_sort_requires_every_pair_orderable() {
        let short = Value::from((1,));
        let text = Value::from((2, "a"));
        let number = Value::from((2, 3));
        let mut items = vec![&short, &number, &text];
        assert!(!Value::sort_if_orderable(&mut items));
        assert_eq!(items, vec![&short, &number, &text]);
    }

    #[test]
    fn test_iter_items() {
        assert_eq!(
            Value::from("ab").iter_items(),
            Some(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(
            Value::dict([("k", 1)]).iter_items(),
            Some(vec![Value::from("k")])
        );
        assert_eq!(Value::from(1).iter_items(), None);
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({"a": [1, 2.5, null], "b": true}));
        assert_eq!(
            value,
            Value::dict([
                ("a", Value::list([Value::Int(1), Value::Float(2.5), Value::None])),
                ("b", Value::Bool(true)),
            ])
        );
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        assert_eq!(Value::from(u64::MAX), Value::Float(u64::MAX as f64));
        assert_eq!(Value::from(5u64), Value::Int(5));
    }
}
