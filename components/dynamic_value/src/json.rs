//! JSON bridge.
//!
//! Parsing produces a pure [`Value`] tree: JSON objects become
//! [`DynamicObject`]s in document order, arrays become [`DynamicList`]s.
//! Serialization writes members in insertion order, so text produced here
//! parses back to an equal graph.

use serde::de::DeserializeOwned;
use serde_json::{Map, Number};

use crate::config::{JsonOptions, NonFiniteNumbers};
use crate::convert::convert;
use crate::error::{BridgeResult, ParseError, SerializationError};
use crate::object::{DynamicList, DynamicObject};
use crate::value::Value;

/// JSON encode/decode with explicit options.
///
/// # Examples
///
/// ```
/// use dynamic_value::{JsonBridge, JsonOptions};
///
/// let bridge = JsonBridge::new(JsonOptions::default());
/// let value = bridge.parse_json(r#"{"b":1,"a":[true,null]}"#).unwrap();
/// assert_eq!(bridge.to_json(&value).unwrap(), r#"{"b":1,"a":[true,null]}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonBridge {
    options: JsonOptions,
}

impl JsonBridge {
    /// Create a bridge with the given options
    pub fn new(options: JsonOptions) -> Self {
        JsonBridge { options }
    }

    /// Options in effect
    pub fn options(&self) -> &JsonOptions {
        &self.options
    }

    /// Serialize a value graph to JSON text.
    pub fn to_json(&self, value: &Value) -> Result<String, SerializationError> {
        let json = to_json_value(value, &self.options)?;
        let text = if self.options.pretty {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        }
        .map_err(|e| SerializationError::Unsupported(e.to_string()))?;
        tracing::trace!(len = text.len(), "serialized value graph");
        Ok(text)
    }

    /// Parse JSON text into a dynamic value tree.
    pub fn parse_json(&self, text: &str) -> Result<Value, ParseError> {
        tracing::trace!(len = text.len(), "parsing JSON text");
        serde_json::from_str::<Value>(text).map_err(ParseError::from)
    }

    /// Parse JSON text and convert the tree to `T`.
    pub fn parse_json_as<T>(&self, text: &str) -> BridgeResult<T>
    where
        T: DeserializeOwned + 'static,
    {
        let value = self.parse_json(text)?;
        Ok(convert::<T>(&value)?)
    }
}

/// Serialize with default options.
pub fn to_json(value: &Value) -> Result<String, SerializationError> {
    JsonBridge::default().to_json(value)
}

/// Parse into a dynamic value tree with default options.
///
/// ```
/// use dynamic_value::parse_json;
///
/// let value = parse_json(r#"{"meta":{"n":0}}"#).unwrap();
/// assert!(value.is_truthy());
/// assert!(parse_json("{oops}").is_err());
/// ```
pub fn parse_json(text: &str) -> Result<Value, ParseError> {
    JsonBridge::default().parse_json(text)
}

/// Parse and convert to `T` with default options.
pub fn parse_json_as<T>(text: &str) -> BridgeResult<T>
where
    T: DeserializeOwned + 'static,
{
    JsonBridge::default().parse_json_as(text)
}

/// View a value as a dynamic object.
///
/// Objects are returned as the same handle. Strings holding JSON object text
/// are parsed, typed host values are rebuilt from their JSON form. Anything
/// else has no object view.
pub fn to_dynamic(value: &Value) -> Option<DynamicObject> {
    let rebuilt = match value {
        Value::Object(obj) => return Some(obj.clone()),
        Value::String(text) => parse_json(text).ok()?,
        Value::Typed(host) => from_json_value(&host.to_json().ok()?),
        _ => return None,
    };
    match rebuilt {
        Value::Object(obj) => Some(obj),
        _ => None,
    }
}

/// Convert a codec tree into a dynamic value tree.
pub fn from_json_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                n.as_f64().map(Value::Float).unwrap_or(Value::Null)
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::List(items.iter().map(from_json_value).collect::<DynamicList>())
        }
        serde_json::Value::Object(members) => Value::Object(
            members
                .iter()
                .map(|(k, v)| (k.clone(), from_json_value(v)))
                .collect::<DynamicObject>(),
        ),
    }
}

/// Convert a dynamic value tree into a codec tree.
///
/// Fails on reference cycles and, depending on `options`, on non-finite
/// numbers.
pub fn to_json_value(
    value: &Value,
    options: &JsonOptions,
) -> Result<serde_json::Value, SerializationError> {
    TreeWriter {
        options,
        path: Vec::new(),
    }
    .write(value)
}

/// Walks a value graph, tracking the containers on the current path.
struct TreeWriter<'a> {
    options: &'a JsonOptions,
    path: Vec<usize>,
}

impl TreeWriter<'_> {
    fn write(&mut self, value: &Value) -> Result<serde_json::Value, SerializationError> {
        match value {
            Value::Null => Ok(serde_json::Value::Null),
            Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
            Value::Int(n) => Ok(serde_json::Value::Number((*n).into())),
            Value::UInt(n) => Ok(serde_json::Value::Number((*n).into())),
            Value::Float(f) => match Number::from_f64(*f) {
                Some(n) => Ok(serde_json::Value::Number(n)),
                None => match self.options.non_finite {
                    NonFiniteNumbers::Null => Ok(serde_json::Value::Null),
                    NonFiniteNumbers::Error => Err(SerializationError::NonFiniteNumber(*f)),
                },
            },
            Value::String(s) => Ok(serde_json::Value::String(s.clone())),
            Value::Object(obj) => self.nested(obj.id(), |writer| {
                let mut members = Map::new();
                for (key, member) in obj.to_key_value_list() {
                    if writer.options.omit_null_properties && member.is_null() {
                        continue;
                    }
                    members.insert(key, writer.write(&member)?);
                }
                Ok(serde_json::Value::Object(members))
            }),
            Value::List(list) => self.nested(list.id(), |writer| {
                let items = list
                    .to_vec()
                    .iter()
                    .map(|item| writer.write(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(serde_json::Value::Array(items))
            }),
            Value::Typed(host) => {
                let mut json = host
                    .to_json()
                    .map_err(|e| SerializationError::Unsupported(e.to_string()))?;
                if self.options.omit_null_properties {
                    strip_null_members(&mut json);
                }
                Ok(json)
            }
        }
    }

    fn nested<F>(&mut self, id: usize, f: F) -> Result<serde_json::Value, SerializationError>
    where
        F: FnOnce(&mut Self) -> Result<serde_json::Value, SerializationError>,
    {
        if self.path.contains(&id) {
            tracing::debug!(depth = self.path.len(), "reference cycle in value graph");
            return Err(SerializationError::CyclicGraph);
        }
        self.path.push(id);
        let result = f(self);
        self.path.pop();
        result
    }
}

fn strip_null_members(json: &mut serde_json::Value) {
    match json {
        serde_json::Value::Object(members) => {
            members.retain(|_, v| !v.is_null());
            members.values_mut().for_each(strip_null_members);
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(strip_null_members),
        _ => {}
    }
}
