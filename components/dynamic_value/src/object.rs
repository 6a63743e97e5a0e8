//! Dynamic object and list containers.
//!
//! Both containers are shared handles over interior storage. Cloning a handle
//! aliases the storage; [`crate::clone_value`] produces an independent copy.
//! Insertion order of object members is kept for enumeration and
//! serialization, though it does not take part in equality.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::{self, DeserializeOwned, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::convert::convert;
use crate::json::to_dynamic;
use crate::value::{lists_eq, objects_eq, Value};

/// Internal object data
#[derive(Debug, Default)]
struct ObjectData {
    /// Members in insertion order; keys are unique
    entries: Vec<(String, Value)>,
}

impl ObjectData {
    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

/// A mapping from string keys to [`Value`]s.
///
/// # Examples
///
/// ```
/// use dynamic_value::{DynamicObject, Value};
///
/// let obj = DynamicObject::new();
/// obj.set("n", 0);
/// assert!(obj.has("n"));
/// assert_eq!(obj.get::<i32>("n"), 0);
/// assert_eq!(obj.get::<i32>("missing"), 0);
/// assert!(Value::from(obj).is_truthy());
/// ```
#[derive(Clone, Default)]
pub struct DynamicObject {
    inner: Arc<RwLock<ObjectData>>,
}

impl DynamicObject {
    /// Create empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a member. A replaced member keeps its position.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut data = self.inner.write();
        match data.position(&key) {
            Some(idx) => data.entries[idx].1 = value,
            None => data.entries.push((key, value)),
        }
    }

    /// Remove a member, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut data = self.inner.write();
        let idx = data.position(key)?;
        Some(data.entries.remove(idx).1)
    }

    /// Raw stored value, without coercion.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let data = self.inner.read();
        data.position(key).map(|idx| data.entries[idx].1.clone())
    }

    /// Coerced value at `key`, or `T::default()` when the key is absent or
    /// the stored value does not convert.
    pub fn get<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default + 'static,
    {
        let Some(value) = self.get_value(key) else {
            return T::default();
        };
        match convert::<T>(&value) {
            Ok(converted) => converted,
            Err(err) => {
                tracing::debug!(key, error = %err, "coercion failed, using default");
                T::default()
            }
        }
    }

    /// Member at `key` viewed as a dynamic object.
    pub fn get_object(&self, key: &str) -> Option<DynamicObject> {
        self.get_value(key).as_ref().and_then(to_dynamic)
    }

    /// Whether the key is present
    pub fn has(&self, key: &str) -> bool {
        self.inner.read().position(key).is_some()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.inner.read().entries.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of the members in insertion order.
    pub fn to_key_value_list(&self) -> Vec<(String, Value)> {
        self.inner.read().entries.clone()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// True when the object has no members
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Whether both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &DynamicObject) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DynamicObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let obj = DynamicObject::new();
        for (key, value) in iter {
            obj.set(key, value);
        }
        obj
    }
}

impl PartialEq for DynamicObject {
    fn eq(&self, other: &Self) -> bool {
        objects_eq(self, other, &mut Vec::new())
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Object(self.clone()), f)
    }
}

impl Serialize for DynamicObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::Object(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DynamicObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(obj) => Ok(obj),
            Value::Null => Ok(DynamicObject::new()),
            other => Err(de::Error::invalid_type(
                Unexpected::Other(other.type_name()),
                &"an object",
            )),
        }
    }
}

/// An ordered, index-based sequence of [`Value`]s.
#[derive(Clone, Default)]
pub struct DynamicList {
    inner: Arc<RwLock<Vec<Value>>>,
}

impl DynamicList {
    /// Create empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element
    pub fn push(&self, value: impl Into<Value>) {
        self.inner.write().push(value.into());
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        self.inner.read().get(index).cloned()
    }

    /// Replace the element at `index`. Returns false when out of bounds.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> bool {
        match self.inner.write().get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Insert at `index`, clamped to the list length.
    pub fn insert(&self, index: usize, value: impl Into<Value>) {
        let mut items = self.inner.write();
        let index = index.min(items.len());
        items.insert(index, value.into());
    }

    /// Remove the element at `index`.
    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut items = self.inner.write();
        (index < items.len()).then(|| items.remove(index))
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// True when the list has no elements
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.inner.read().clone()
    }

    /// Whether both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &DynamicList) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl From<Vec<Value>> for DynamicList {
    fn from(items: Vec<Value>) -> Self {
        DynamicList {
            inner: Arc::new(RwLock::new(items)),
        }
    }
}

impl<V: Into<Value>> FromIterator<V> for DynamicList {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        DynamicList::from(iter.into_iter().map(Into::into).collect::<Vec<_>>())
    }
}

impl PartialEq for DynamicList {
    fn eq(&self, other: &Self) -> bool {
        lists_eq(self, other, &mut Vec::new())
    }
}

impl fmt::Debug for DynamicList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::List(self.clone()), f)
    }
}

impl Serialize for DynamicList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::List(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DynamicList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::List(list) => Ok(list),
            Value::Null => Ok(DynamicList::new()),
            other => Err(de::Error::invalid_type(
                Unexpected::Other(other.type_name()),
                &"a list",
            )),
        }
    }
}

/// Coerced value at `key`; the default of `T` when `obj` is absent, the key
/// is missing, or the value does not convert.
///
/// ```
/// use dynamic_value::object::get;
///
/// assert_eq!(get::<i32>(None, "x"), 0);
/// ```
pub fn get<T>(obj: Option<&DynamicObject>, key: &str) -> T
where
    T: DeserializeOwned + Default + 'static,
{
    obj.map(|o| o.get::<T>(key)).unwrap_or_default()
}

/// Member at `key` re-wrapped as a dynamic object, if present and object-shaped.
pub fn get_object(obj: Option<&DynamicObject>, key: &str) -> Option<DynamicObject> {
    obj.and_then(|o| o.get_object(key))
}

/// True iff `obj` is present and holds `key`.
pub fn has(obj: Option<&DynamicObject>, key: &str) -> bool {
    obj.is_some_and(|o| o.has(key))
}

/// True iff the value is a key to value mapping.
///
/// Typed host values never qualify, even when they serialize to a JSON object.
pub fn is_dynamic_object(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// True iff the value is a dynamic object with zero members.
pub fn is_empty_object(value: &Value) -> bool {
    matches!(value, Value::Object(obj) if obj.is_empty())
}

/// Members in insertion order; empty when `obj` is absent or empty.
pub fn to_key_value_list(obj: Option<&DynamicObject>) -> Vec<(String, Value)> {
    obj.map(DynamicObject::to_key_value_list).unwrap_or_default()
}
