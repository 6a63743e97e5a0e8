//! Dynamic value representation.
//!
//! [`Value`] is the tagged union every other component operates on. Shape
//! probing is done on its discriminant, never on the Rust type of a payload.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Error as _, Serialize, Serializer};

use crate::config::JsonOptions;
use crate::json::to_json_value;
use crate::object::{DynamicList, DynamicObject};

/// A strongly typed value supplied by the host and carried opaquely.
///
/// The layer only needs three things from such a value: its JSON form, an
/// optional deep-copy, and a way to hand the original back to the caller.
pub trait HostObject: fmt::Debug + Send + Sync + 'static {
    /// JSON representation of the value's public fields.
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error>;

    /// Independent copy of the value, if the type supports one.
    fn try_clone(&self) -> Option<Arc<dyn HostObject>> {
        None
    }

    /// The wrapped value, for downcasting.
    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug)]
struct Opaque<T>(T);

impl<T> HostObject for Opaque<T>
where
    T: Serialize + fmt::Debug + Send + Sync + 'static,
{
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.0)
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }
}

#[derive(Debug)]
struct Cloneable<T>(T);

impl<T> HostObject for Cloneable<T>
where
    T: Serialize + Clone + fmt::Debug + Send + Sync + 'static,
{
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.0)
    }

    fn try_clone(&self) -> Option<Arc<dyn HostObject>> {
        Some(Arc::new(Cloneable(self.0.clone())))
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }
}

/// Represents any dynamic value.
///
/// Objects and lists are shared handles: cloning a `Value` that holds one
/// aliases the same container. Use [`crate::clone_value`] for a copy.
///
/// # Examples
///
/// ```
/// use dynamic_value::Value;
///
/// let v = Value::from("0");
/// assert!(v.is_truthy());
/// assert!(!Value::from(0).is_truthy());
/// assert_eq!(v.type_name(), "string");
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// Absent / null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integral number
    Int(i64),
    /// Integral number above `i64::MAX`
    UInt(u64),
    /// Floating point number
    Float(f64),
    /// String value
    String(String),
    /// Key to value mapping
    Object(DynamicObject),
    /// Ordered sequence
    List(DynamicList),
    /// Opaque host value
    Typed(Arc<dyn HostObject>),
}

impl Value {
    /// Wrap a serializable host value. Deep clones share it by reference.
    pub fn typed<T>(value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Value::Typed(Arc::new(Opaque(value)))
    }

    /// Wrap a host value that deep clones duplicate through `Clone`.
    pub fn typed_cloneable<T>(value: T) -> Self
    where
        T: Serialize + Clone + fmt::Debug + Send + Sync + 'static,
    {
        Value::Typed(Arc::new(Cloneable(value)))
    }

    /// Borrow the host value back if this is a `Typed` value of type `T`.
    pub fn downcast_typed<T: 'static>(&self) -> Option<&T> {
        match self {
            Value::Typed(host) => host.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is a number of either representation
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::Float(_))
    }

    /// Check if value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if value is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64; floats only when integral
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < 9.2e18 => Some(*f as i64),
            _ => None,
        }
    }

    /// Get as u64; floats only when integral
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(n) => u64::try_from(*n).ok(),
            Value::UInt(n) => Some(*n),
            Value::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f < 1.8e19 => Some(*f as u64),
            _ => None,
        }
    }

    /// Get as f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::UInt(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the object handle
    pub fn as_object(&self) -> Option<&DynamicObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Get the list handle
    pub fn as_list(&self) -> Option<&DynamicList> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::UInt(_) | Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::List(_) => "list",
            Value::Typed(_) => "typed value",
        }
    }
}

/// Debug view of a value graph; tracks the containers on the current path.
struct GraphDebug<'a> {
    value: &'a Value,
    path: &'a RefCell<Vec<usize>>,
}

impl GraphDebug<'_> {
    fn child<'b>(&'b self, value: &'b Value) -> GraphDebug<'b> {
        GraphDebug {
            value,
            path: self.path,
        }
    }

    fn enter(&self, id: usize) -> bool {
        let mut path = self.path.borrow_mut();
        if path.contains(&id) {
            return false;
        }
        path.push(id);
        true
    }

    fn leave(&self) {
        self.path.borrow_mut().pop();
    }
}

impl fmt::Debug for GraphDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::UInt(n) => f.debug_tuple("UInt").field(n).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Object(obj) => {
                if !self.enter(obj.id()) {
                    return write!(f, "[Circular]");
                }
                let entries = obj.to_key_value_list();
                let result = f
                    .debug_map()
                    .entries(entries.iter().map(|(k, v)| (k, self.child(v))))
                    .finish();
                self.leave();
                result
            }
            Value::List(list) => {
                if !self.enter(list.id()) {
                    return write!(f, "[Circular]");
                }
                let items = list.to_vec();
                let result = f
                    .debug_list()
                    .entries(items.iter().map(|item| self.child(item)))
                    .finish();
                self.leave();
                result
            }
            Value::Typed(host) => f.debug_tuple("Typed").field(host).finish(),
        }
    }
}

/// Containers reached again on the current path print as `[Circular]`.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = RefCell::new(Vec::new());
        GraphDebug { value: self, path: &path }.fmt(f)
    }
}

/// Structural equality.
///
/// Integers and floats compare numerically, objects compare as key sets
/// regardless of insertion order, typed values only equal the same handle.
/// Cyclic graphs are equal when their shapes match.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_eq(self, other, &mut Vec::new())
    }
}

/// Pairs of containers under comparison on the current path.
pub(crate) type EqPath = Vec<(usize, usize)>;

fn values_eq(a: &Value, b: &Value, path: &mut EqPath) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::UInt(a), Value::UInt(b)) => a == b,
        (Value::Int(a), Value::UInt(b)) | (Value::UInt(b), Value::Int(a)) => {
            i128::from(*a) == i128::from(*b)
        }
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
            (*a as f64) == *b
        }
        (Value::UInt(a), Value::Float(b)) | (Value::Float(b), Value::UInt(a)) => {
            (*a as f64) == *b
        }
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Object(a), Value::Object(b)) => objects_eq(a, b, path),
        (Value::List(a), Value::List(b)) => lists_eq(a, b, path),
        (Value::Typed(a), Value::Typed(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

/// Runs `compare` unless the pair is already being compared higher up.
fn nested_eq(
    pair: (usize, usize),
    path: &mut EqPath,
    compare: impl FnOnce(&mut EqPath) -> bool,
) -> bool {
    if pair.0 == pair.1 || path.contains(&pair) {
        return true;
    }
    path.push(pair);
    let equal = compare(path);
    path.pop();
    equal
}

pub(crate) fn objects_eq(a: &DynamicObject, b: &DynamicObject, path: &mut EqPath) -> bool {
    nested_eq((a.id(), b.id()), path, |path| {
        let ours = a.to_key_value_list();
        ours.len() == b.len()
            && ours.iter().all(|(key, value)| {
                b.get_value(key)
                    .is_some_and(|theirs| values_eq(value, &theirs, path))
            })
    })
}

pub(crate) fn lists_eq(a: &DynamicList, b: &DynamicList, path: &mut EqPath) -> bool {
    nested_eq((a.id(), b.id()), path, |path| {
        let (ours, theirs) = (a.to_vec(), b.to_vec());
        ours.len() == theirs.len()
            && ours
                .iter()
                .zip(theirs.iter())
                .all(|(x, y)| values_eq(x, y, path))
    })
}

/// String conversion with JavaScript `String()` flavor.
///
/// A list nested inside itself contributes an empty string, as
/// `Array.prototype.join` does.
///
/// ```
/// use dynamic_value::Value;
///
/// assert_eq!(Value::Null.to_string(), "null");
/// assert_eq!(Value::Float(3.0).to_string(), "3");
/// assert_eq!(Value::Float(2.5).to_string(), "2.5");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Float(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Object(_) | Value::Typed(_) => write!(f, "[object Object]"),
            Value::List(list) => write!(f, "{}", join_list(list, &mut Vec::new())),
        }
    }
}

fn join_list(list: &DynamicList, path: &mut Vec<usize>) -> String {
    if path.contains(&list.id()) {
        return String::new();
    }
    path.push(list.id());
    let items: Vec<String> = list
        .to_vec()
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            Value::List(inner) => join_list(inner, path),
            other => other.to_string(),
        })
        .collect();
    path.pop();
    items.join(",")
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(n as i64)
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n).map(Value::Int).unwrap_or(Value::UInt(n))
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DynamicObject> for Value {
    fn from(obj: DynamicObject) -> Self {
        Value::Object(obj)
    }
}

impl From<DynamicList> for Value {
    fn from(list: DynamicList) -> Self {
        Value::List(list)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(DynamicList::from(items))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json_value(self, &JsonOptions::default())
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
        Ok(Value::Int(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
        Ok(Value::from(n))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Value, E> {
        Ok(Value::Float(n))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(DynamicList::from(items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let obj = DynamicObject::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            obj.set(key, value);
        }
        Ok(Value::Object(obj))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}
