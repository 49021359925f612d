//! Conversion of `serde::Serialize` types into values
//!
//! Structs become introspectable [`Object`]s named after the struct, tuple
//! and unit structs become opaque objects, newtype structs become
//! [`crate::Subtype`]s over their inner value and enum variants are named
//! `Enum::Variant`. Sequences map to lists, tuples to tuples and maps to
//! dicts.

use serde::ser::{self, Serialize};

use crate::{Object, Value, ValueError, ValueResult};

/// Convert any serializable value into a [`Value`]
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> ValueResult<Value> {
    value.serialize(ValueSerializer)
}

struct ValueSerializer;

fn variant_name(name: &str, variant: &str) -> String {
    format!("{}::{}", name, variant)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ValueError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = ObjectBuilder;
    type SerializeTupleVariant = ObjectBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = ObjectBuilder;
    type SerializeStructVariant = ObjectBuilder;

    fn serialize_bool(self, v: bool) -> ValueResult<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> ValueResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> ValueResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> ValueResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> ValueResult<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> ValueResult<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| ValueError::IntegerOutOfRange {
                value: v.to_string(),
            })
    }

    fn serialize_u8(self, v: u8) -> ValueResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> ValueResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> ValueResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> ValueResult<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| ValueError::IntegerOutOfRange {
                value: v.to_string(),
            })
    }

    fn serialize_u128(self, v: u128) -> ValueResult<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| ValueError::IntegerOutOfRange {
                value: v.to_string(),
            })
    }

    fn serialize_f32(self, v: f32) -> ValueResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> ValueResult<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> ValueResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_str(self, v: &str) -> ValueResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> ValueResult<Value> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> ValueResult<Value> {
        Ok(Value::None)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> ValueResult<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> ValueResult<Value> {
        Ok(Value::None)
    }

    fn serialize_unit_struct(self, name: &'static str) -> ValueResult<Value> {
        Ok(Object::opaque(name).into())
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> ValueResult<Value> {
        Ok(Object::opaque(variant_name(name, variant)).into())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> ValueResult<Value> {
        Ok(Value::subtype(name, to_value(value)?))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> ValueResult<Value> {
        Ok(Value::subtype(variant_name(name, variant), to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> ValueResult<SeqBuilder> {
        Ok(SeqBuilder::new(len.unwrap_or(0), false))
    }

    fn serialize_tuple(self, len: usize) -> ValueResult<SeqBuilder> {
        Ok(SeqBuilder::new(len, true))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> ValueResult<ObjectBuilder> {
        Ok(ObjectBuilder::new(name.to_string(), len, false))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> ValueResult<ObjectBuilder> {
        Ok(ObjectBuilder::new(variant_name(name, variant), len, false))
    }

    fn serialize_map(self, len: Option<usize>) -> ValueResult<MapBuilder> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> ValueResult<ObjectBuilder> {
        Ok(ObjectBuilder::new(name.to_string(), len, true))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> ValueResult<ObjectBuilder> {
        Ok(ObjectBuilder::new(variant_name(name, variant), len, true))
    }
}

struct SeqBuilder {
    items: Vec<Value>,
    tuple: bool,
}

impl SeqBuilder {
    fn new(capacity: usize, tuple: bool) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            tuple,
        }
    }

    fn finish(self) -> Value {
        if self.tuple {
            Value::Tuple(self.items)
        } else {
            Value::List(self.items)
        }
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> ValueResult<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> ValueResult<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

/// Collects fields for structs, tuple structs and their enum variants
struct ObjectBuilder {
    type_name: String,
    fields: Vec<(String, Value)>,
    introspectable: bool,
}

impl ObjectBuilder {
    fn new(type_name: String, capacity: usize, introspectable: bool) -> Self {
        Self {
            type_name,
            fields: Vec::with_capacity(capacity),
            introspectable,
        }
    }

    fn push_positional<T: ?Sized + Serialize>(&mut self, value: &T) -> ValueResult<()> {
        let index = self.fields.len().to_string();
        self.fields.push((index, to_value(value)?));
        Ok(())
    }

    fn finish(self) -> Value {
        let object = if self.introspectable {
            Object::new(self.type_name)
        } else {
            Object::opaque(self.type_name)
        };
        object.attrs(self.fields).into()
    }
}

impl ser::SerializeTupleStruct for ObjectBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> ValueResult<()> {
        self.push_positional(value)
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for ObjectBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> ValueResult<()> {
        self.push_positional(value)
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for ObjectBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> ValueResult<()> {
        self.fields.push((key.to_string(), to_value(value)?));
        Ok(())
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for ObjectBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> ValueResult<()> {
        self.fields.push((key.to_string(), to_value(value)?));
        Ok(())
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

struct MapBuilder {
    entries: Vec<(Value, Value)>,
    pending_key: Option<Value>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> ValueResult<()> {
        self.pending_key = Some(to_value(key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> ValueResult<()> {
        let key = self
            .pending_key
            .take()
            .ok_or(ValueError::IncompleteMapEntry("key"))?;
        self.entries.push((key, to_value(value)?));
        Ok(())
    }

    fn end(self) -> ValueResult<Value> {
        if self.pending_key.is_some() {
            return Err(ValueError::IncompleteMapEntry("value"));
        }
        Ok(Value::Dict(self.entries))
    }
}
