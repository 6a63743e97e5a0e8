//! Value coercion to caller-chosen Rust types.
//!
//! The target type is described by its `Deserialize` impl. [`convert`] drives
//! that impl with a lenient deserializer that performs the textual and
//! numeric coercions a loosely typed payload needs:
//!
//! - `"5"` converts to `5`, `"2.5"` to `2.5`, `"TRUE"` to `true`
//! - numbers convert to `bool` (zero is `false`) and to `String`
//! - `null` converts to the target's default (`0`, `false`, `""`, `None`,
//!   empty collections, records of defaults)
//! - record fields missing from an object take the record's declared default
//!   (`#[serde(default)]` on the field or the record); fields without one are
//!   fed `null` and so take the default of their own type
//! - extra keys are ignored unless the record denies unknown fields
//!
//! Absent fields are resolved by retrying: a record field reported missing is
//! remembered by record and field name, and the next attempt feeds it `null`.

use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::rc::Rc;
use std::vec;

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};

use crate::error::{ConversionError, ConvertResult};
use crate::json::from_json_value;
use crate::object::{DynamicList, DynamicObject};
use crate::value::Value;

/// Convert a value to `T`.
///
/// Converting to [`Value`], [`DynamicObject`] or [`DynamicList`] from a value
/// of that shape returns the same handle without copying.
///
/// # Examples
///
/// ```
/// use dynamic_value::{convert, Value};
///
/// assert_eq!(convert::<i32>(&Value::from("5")).unwrap(), 5);
/// assert!(convert::<i32>(&Value::from("abc")).is_err());
/// assert_eq!(convert::<bool>(&Value::from(0)).unwrap(), false);
/// assert_eq!(convert::<u16>(&Value::Null).unwrap(), 0);
/// ```
pub fn convert<T>(value: &Value) -> ConvertResult<T>
where
    T: DeserializeOwned + 'static,
{
    if let Some(same) = identity::<T>(value) {
        return Ok(same);
    }
    let mut null_fields = HashSet::new();
    loop {
        let deserializer = ValueDeserializer {
            value: value.clone(),
            null_fields: Rc::new(null_fields.clone()),
        };
        match T::deserialize(deserializer) {
            Err(ConversionError::MissingField { record, field })
                if null_fields.insert((record, field)) =>
            {
                tracing::trace!(record, field, "feeding null to absent field");
            }
            result => return result,
        }
    }
}

fn identity<T: 'static>(value: &Value) -> Option<T> {
    let target = TypeId::of::<T>();
    let boxed: Box<dyn Any> = if target == TypeId::of::<Value>() {
        Box::new(value.clone())
    } else {
        match value {
            Value::Object(obj) if target == TypeId::of::<DynamicObject>() => Box::new(obj.clone()),
            Value::List(list) if target == TypeId::of::<DynamicList>() => Box::new(list.clone()),
            _ => return None,
        }
    };
    boxed.downcast::<T>().ok().map(|same| *same)
}

fn mismatch(expected: impl Into<String>, found: &Value) -> ConversionError {
    ConversionError::Mismatch {
        expected: expected.into(),
        found: found.type_name(),
    }
}

/// Record fields, by record and field name, that are fed `null` when absent.
type NullFields = Rc<HashSet<(&'static str, &'static str)>>;

/// Lenient deserializer over an owned [`Value`].
///
/// Used directly, an absent record field without a declared default fails
/// with [`ConversionError::MissingField`]; [`convert`] recovers from that.
pub struct ValueDeserializer {
    value: Value,
    null_fields: NullFields,
}

impl ValueDeserializer {
    /// Wrap a value for deserialization.
    pub fn new(value: Value) -> Self {
        ValueDeserializer {
            value,
            null_fields: NullFields::default(),
        }
    }

    fn child(&self, value: Value) -> Self {
        ValueDeserializer {
            value,
            null_fields: self.null_fields.clone(),
        }
    }

    /// The value with typed host payloads replaced by their JSON form.
    fn into_plain(self) -> ConvertResult<Value> {
        match self.value {
            Value::Typed(host) => host
                .to_json()
                .map(|json| from_json_value(&json))
                .map_err(|e| ConversionError::Custom(e.to_string())),
            other => Ok(other),
        }
    }

    fn integer(self, target: &'static str) -> ConvertResult<i128> {
        match self.into_plain()? {
            Value::Null => Ok(0),
            Value::Bool(b) => Ok(b as i128),
            Value::Int(n) => Ok(n as i128),
            Value::UInt(n) => Ok(n as i128),
            Value::Float(f) if !f.is_finite() || f.abs() >= 1.7e38 => {
                Err(ConversionError::OutOfRange {
                    value: f.to_string(),
                    target,
                })
            }
            Value::Float(f) if f.fract() != 0.0 => Err(ConversionError::Mismatch {
                expected: format!("an integral {}", target),
                found: "fractional number",
            }),
            Value::Float(f) => Ok(f as i128),
            Value::String(s) => {
                s.trim()
                    .parse::<i128>()
                    .map_err(|_| ConversionError::InvalidText { text: s, target })
            }
            other => Err(mismatch(target, &other)),
        }
    }

    fn float(self, target: &'static str) -> ConvertResult<f64> {
        match self.into_plain()? {
            Value::Null => Ok(0.0),
            Value::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
            Value::Int(n) => Ok(n as f64),
            Value::UInt(n) => Ok(n as f64),
            Value::Float(f) => Ok(f),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ConversionError::InvalidText { text: s, target }),
            other => Err(mismatch(target, &other)),
        }
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $t:ty, $visit:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
                let target = stringify!($t);
                let n = self.integer(target)?;
                let narrowed = <$t>::try_from(n).map_err(|_| ConversionError::OutOfRange {
                    value: n.to_string(),
                    target,
                })?;
                visitor.$visit(narrowed)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = ConversionError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        let null_fields = self.null_fields.clone();
        match self.into_plain()? {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(n) => visitor.visit_i64(n),
            Value::UInt(n) => visitor.visit_u64(n),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::List(list) => {
                visitor.visit_seq(SeqDeserializer::new(list.to_vec(), null_fields))
            }
            Value::Object(obj) => {
                visitor.visit_map(MapDeserializer::new(obj.to_key_value_list(), null_fields))
            }
            Value::Typed(_) => Err(ConversionError::Custom("unresolved typed value".to_string())),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        match self.into_plain()? {
            Value::Null => visitor.visit_bool(false),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(n) => visitor.visit_bool(n != 0),
            Value::UInt(n) => visitor.visit_bool(n != 0),
            Value::Float(f) => visitor.visit_bool(f != 0.0),
            Value::String(s) => {
                let text = s.trim();
                if text.eq_ignore_ascii_case("true") {
                    visitor.visit_bool(true)
                } else if text.eq_ignore_ascii_case("false") {
                    visitor.visit_bool(false)
                } else {
                    Err(ConversionError::InvalidText {
                        text: s,
                        target: "bool",
                    })
                }
            }
            other => Err(mismatch("bool", &other)),
        }
    }

    deserialize_integer! {
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_i128 => i128, visit_i128;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_u128 => u128, visit_u128;
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        visitor.visit_f32(self.float("f32")? as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        visitor.visit_f64(self.float("f64")?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        match self.into_plain()? {
            Value::Null => visitor.visit_char('\0'),
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(ConversionError::InvalidText {
                        text: s,
                        target: "char",
                    }),
                }
            }
            other => Err(mismatch("char", &other)),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        match self.into_plain()? {
            Value::Null => visitor.visit_str(""),
            Value::String(s) => visitor.visit_string(s),
            scalar @ (Value::Bool(_) | Value::Int(_) | Value::UInt(_) | Value::Float(_)) => {
                visitor.visit_string(scalar.to_string())
            }
            other => Err(mismatch("string", &other)),
        }
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        let null_fields = self.null_fields.clone();
        match self.into_plain()? {
            Value::Null => visitor.visit_byte_buf(Vec::new()),
            Value::String(s) => visitor.visit_byte_buf(s.into_bytes()),
            value => ValueDeserializer { value, null_fields }.deserialize_any(visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        let null_fields = self.null_fields.clone();
        match self.into_plain()? {
            Value::Null => visitor.visit_none(),
            value => visitor.visit_some(ValueDeserializer { value, null_fields }),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        match self.into_plain()? {
            Value::Null => visitor.visit_unit(),
            other => Err(mismatch("null", &other)),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> ConvertResult<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> ConvertResult<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        let null_fields = self.null_fields.clone();
        let items = match self.into_plain()? {
            Value::Null => Vec::new(),
            Value::List(list) => list.to_vec(),
            other => return Err(mismatch("a list", &other)),
        };
        visitor.visit_seq(SeqDeserializer::new(items, null_fields))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> ConvertResult<V::Value> {
        let null_fields = self.null_fields.clone();
        let mut items = match self.into_plain()? {
            Value::Null => Vec::new(),
            Value::List(list) => list.to_vec(),
            other => return Err(mismatch(format!("a tuple of {}", len), &other)),
        };
        if items.len() < len {
            items.resize(len, Value::Null);
        }
        visitor.visit_seq(SeqDeserializer::new(items, null_fields))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> ConvertResult<V::Value> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        let null_fields = self.null_fields.clone();
        let entries = match self.into_plain()? {
            Value::Null => Vec::new(),
            Value::Object(obj) => obj.to_key_value_list(),
            other => return Err(mismatch("an object", &other)),
        };
        visitor.visit_map(MapDeserializer::new(entries, null_fields))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> ConvertResult<V::Value> {
        let null_fields = self.null_fields.clone();
        let mut entries = match self.into_plain()? {
            Value::Null => Vec::new(),
            Value::Object(obj) => obj.to_key_value_list(),
            other => return Err(mismatch(name, &other)),
        };
        for field in fields {
            if null_fields.contains(&(name, *field)) && !entries.iter().any(|(k, _)| k == field) {
                entries.push((field.to_string(), Value::Null));
            }
        }
        visitor
            .visit_map(MapDeserializer::new(entries, null_fields))
            .map_err(|err| match err {
                ConversionError::MissingField { record: "", field } => {
                    ConversionError::MissingField { record: name, field }
                }
                other => other,
            })
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> ConvertResult<V::Value> {
        let null_fields = self.null_fields.clone();
        match self.into_plain()? {
            Value::String(variant) => {
                let access: de::value::StringDeserializer<ConversionError> =
                    variant.into_deserializer();
                visitor.visit_enum(access)
            }
            Value::Object(obj) if obj.len() == 1 => {
                let mut entries = obj.to_key_value_list();
                let (variant, value) = entries.remove(0);
                visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: ValueDeserializer { value, null_fields },
                })
            }
            other => Err(mismatch(format!("a variant of {}", name), &other)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> ConvertResult<V::Value> {
        visitor.visit_unit()
    }
}

struct SeqDeserializer {
    iter: vec::IntoIter<Value>,
    null_fields: NullFields,
}

impl SeqDeserializer {
    fn new(items: Vec<Value>, null_fields: NullFields) -> Self {
        SeqDeserializer {
            iter: items.into_iter(),
            null_fields,
        }
    }

    fn element(&self, value: Value) -> ValueDeserializer {
        ValueDeserializer {
            value,
            null_fields: self.null_fields.clone(),
        }
    }
}

impl<'de> SeqAccess<'de> for SeqDeserializer {
    type Error = ConversionError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> ConvertResult<Option<T::Value>> {
        match self.iter.next() {
            Some(value) => seed.deserialize(self.element(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: vec::IntoIter<(String, Value)>,
    pending: Option<Value>,
    null_fields: NullFields,
}

impl MapDeserializer {
    fn new(entries: Vec<(String, Value)>, null_fields: NullFields) -> Self {
        MapDeserializer {
            iter: entries.into_iter(),
            pending: None,
            null_fields,
        }
    }

    fn member(&self, value: Value) -> ValueDeserializer {
        ValueDeserializer {
            value,
            null_fields: self.null_fields.clone(),
        }
    }
}

impl<'de> MapAccess<'de> for MapDeserializer {
    type Error = ConversionError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> ConvertResult<Option<K::Value>> {
        match self.iter.next() {
            Some((key, value)) => {
                self.pending = Some(value);
                // Keys go through the lenient path so `{"1": ..}` fills integer-keyed maps.
                seed.deserialize(self.member(Value::String(key))).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> ConvertResult<V::Value> {
        let value = self.pending.take().unwrap_or_default();
        seed.deserialize(self.member(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: ValueDeserializer,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = ConversionError;
    type Variant = ValueDeserializer;

    fn variant_seed<S: DeserializeSeed<'de>>(
        self,
        seed: S,
    ) -> ConvertResult<(S::Value, ValueDeserializer)> {
        let variant = seed.deserialize(self.value.child(Value::String(self.variant)))?;
        Ok((variant, self.value))
    }
}

impl<'de> VariantAccess<'de> for ValueDeserializer {
    type Error = ConversionError;

    fn unit_variant(self) -> ConvertResult<()> {
        match self.into_plain()? {
            Value::Null => Ok(()),
            other => Err(mismatch("a unit variant", &other)),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> ConvertResult<T::Value> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> ConvertResult<V::Value> {
        de::Deserializer::deserialize_tuple(self, len, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> ConvertResult<V::Value> {
        de::Deserializer::deserialize_struct(self, "variant", fields, visitor)
    }
}
