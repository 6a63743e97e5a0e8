//! Shallow and deep copies of dynamic containers.
//!
//! A copy always yields a fresh top-level container. In a shallow copy the
//! children are the same handles as in the source; a deep copy recreates
//! every nested object and list. Scalars are copied by value. Typed host
//! values are only duplicated when they were wrapped with
//! [`Value::typed_cloneable`]; otherwise both graphs share the host value.

use crate::error::SerializationError;
use crate::object::{DynamicList, DynamicObject};
use crate::value::Value;

/// Copy a value.
///
/// Objects and lists produce a new container; other values are returned as
/// they are (typed host values honor their clone contract when `deep`).
///
/// # Examples
///
/// ```
/// use dynamic_value::{clone_value, parse_json};
///
/// let original = parse_json(r#"{"meta":{"n":0}}"#).unwrap();
/// let copy = clone_value(&original, true).unwrap();
/// copy.as_object().unwrap().get_object("meta").unwrap().set("n", 1);
///
/// let meta = original.as_object().unwrap().get_object("meta").unwrap();
/// assert_eq!(meta.get::<i32>("n"), 0);
/// ```
pub fn clone_value(source: &Value, deep: bool) -> Result<Value, SerializationError> {
    tracing::trace!(deep, kind = source.type_name(), "cloning value");
    Copier::new(deep).copy(source)
}

/// Copy any sequence of values into a new list.
pub fn clone_items<'a, I>(items: I, deep: bool) -> Result<DynamicList, SerializationError>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut copier = Copier::new(deep);
    let items = items
        .into_iter()
        .map(|item| copier.child(item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DynamicList::from(items))
}

impl DynamicObject {
    /// Copy this object; see [`clone_value`].
    pub fn clone_object(&self, deep: bool) -> Result<DynamicObject, SerializationError> {
        Copier::new(deep).object(self)
    }
}

impl DynamicList {
    /// Copy this list; see [`clone_value`].
    pub fn clone_list(&self, deep: bool) -> Result<DynamicList, SerializationError> {
        Copier::new(deep).list(self)
    }
}

struct Copier {
    deep: bool,
    /// Containers being copied on the current path
    path: Vec<usize>,
}

impl Copier {
    fn new(deep: bool) -> Self {
        Copier {
            deep,
            path: Vec::new(),
        }
    }

    fn copy(&mut self, value: &Value) -> Result<Value, SerializationError> {
        match value {
            Value::Object(obj) => self.object(obj).map(Value::Object),
            Value::List(list) => self.list(list).map(Value::List),
            Value::Typed(host) if self.deep => Ok(host
                .try_clone()
                .map(Value::Typed)
                .unwrap_or_else(|| value.clone())),
            other => Ok(other.clone()),
        }
    }

    fn child(&mut self, value: &Value) -> Result<Value, SerializationError> {
        if self.deep {
            self.copy(value)
        } else {
            Ok(value.clone())
        }
    }

    fn object(&mut self, source: &DynamicObject) -> Result<DynamicObject, SerializationError> {
        self.enter(source.id())?;
        let target = DynamicObject::new();
        for (key, value) in source.to_key_value_list() {
            target.set(key, self.child(&value)?);
        }
        self.path.pop();
        Ok(target)
    }

    fn list(&mut self, source: &DynamicList) -> Result<DynamicList, SerializationError> {
        self.enter(source.id())?;
        let items = source
            .to_vec()
            .iter()
            .map(|item| self.child(item))
            .collect::<Result<Vec<_>, _>>()?;
        self.path.pop();
        Ok(DynamicList::from(items))
    }

    fn enter(&mut self, id: usize) -> Result<(), SerializationError> {
        if self.path.contains(&id) {
            tracing::debug!(depth = self.path.len(), "reference cycle while cloning");
            return Err(SerializationError::CyclicGraph);
        }
        self.path.push(id);
        Ok(())
    }
}
