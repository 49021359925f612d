//! Named objects and subtypes of builtin values

use std::convert::Infallible;

use indexmap::IndexMap;

use crate::Value;

/// An instance of a user-defined type with named attributes
///
/// Objects are introspectable by default: they can enumerate every
/// attribute they carry. Opaque objects still hold their attributes (for
/// equality and display) but refuse to enumerate them, mirroring types with
/// a fixed layout.
#[derive(Debug, Clone)]
pub struct Object {
    type_name: String,
    attributes: IndexMap<String, Value>,
    introspectable: bool,
}

impl Object {
    /// Create an introspectable object of the given type
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: IndexMap::new(),
            introspectable: true,
        }
    }

    /// Create an object that cannot enumerate its attributes
    pub fn opaque(type_name: impl Into<String>) -> Self {
        Self {
            introspectable: false,
            ..Self::new(type_name)
        }
    }

    /// Add or replace an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add or replace several attributes
    pub fn attrs<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.attributes.extend(
            attributes
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        self
    }

    /// Name of the object's type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether the object can enumerate its attributes
    pub fn is_introspectable(&self) -> bool {
        self.introspectable
    }

    /// Enumerate attributes, or `None` for opaque objects
    pub fn attributes(&self) -> Option<&IndexMap<String, Value>> {
        self.introspectable.then_some(&self.attributes)
    }

    /// Look up a single attribute by name, regardless of introspectability
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub(crate) fn raw_attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    /// Equality with a caller-supplied, fallible test for attribute values
    ///
    /// Both objects must have the same type name and attribute names; `eq`
    /// is called with this object's value first. Opaque objects take part
    /// too, since nothing is enumerated to the caller.
    pub fn try_eq_by<E>(
        &self,
        other: &Object,
        mut eq: impl FnMut(&Value, &Value) -> Result<bool, E>,
    ) -> Result<bool, E> {
        if self.type_name != other.type_name || self.attributes.len() != other.attributes.len() {
            return Ok(false);
        }
        for (name, value) in &self.attributes {
            match other.attributes.get(name) {
                Some(other_value) if eq(value, other_value)? => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match self.try_eq_by::<Infallible>(other, |a, b| Ok(a == b)) {
            Ok(equal) => equal,
            Err(never) => match never {},
        }
    }
}

/// A value of a named type derived from a builtin shape
///
/// Subtypes behave like their base value structurally (a subtype of `dict`
/// is still a mapping) but report their own type name, so strict
/// comparisons and type-keyed comparers can tell them apart.
#[derive(Debug, Clone)]
pub struct Subtype {
    type_name: String,
    base: Box<Value>,
}

impl Subtype {
    /// Create a subtype named `type_name` over `base`
    pub fn new(type_name: impl Into<String>, base: impl Into<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            base: Box::new(base.into()),
        }
    }

    /// Name of the subtype
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The wrapped base value
    pub fn base(&self) -> &Value {
        &self.base
    }
}
