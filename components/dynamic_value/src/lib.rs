//! Dynamic JSON-shaped values for loosely typed host data.
//!
//! This crate lets a host manipulate attribute values, configuration payloads
//! and scripting-bridge data without fixing their static types up front,
//! while still offering typed extraction when the expected shape is known.
//!
//! # Overview
//!
//! - [`Value`] - Tagged union of null, booleans, numbers, strings, objects,
//!   lists and opaque typed host values
//! - [`DynamicObject`] / [`DynamicList`] - Shared mutable containers
//! - [`convert`] - Lenient coercion to any `Deserialize` type
//! - [`Truthy`] - JavaScript-style truthiness
//! - [`clone_value`] - Shallow and deep copies
//! - [`JsonBridge`] - JSON text in and out, configured by [`JsonOptions`]
//!
//! # Examples
//!
//! ```
//! use dynamic_value::{object, parse_json, Truthy};
//!
//! let value = parse_json(r#"{"name":"a","tags":["x","y"],"meta":{"n":0}}"#).unwrap();
//! let obj = value.as_object();
//!
//! assert_eq!(object::get::<String>(obj, "name"), "a");
//! let meta = object::get_object(obj, "meta");
//! assert!(meta.as_ref().is_some_and(|m| m.is_truthy()));
//! assert_eq!(object::get::<i32>(None, "x"), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod clone;
mod config;
mod convert;
mod error;
mod json;
pub mod object;
mod truthy;
mod value;

pub use clone::{clone_items, clone_value};
pub use config::{JsonOptions, NonFiniteNumbers};
pub use convert::{convert, ValueDeserializer};
pub use error::{
    BridgeError, BridgeResult, ConversionError, ConvertResult, ParseError, SerializationError,
};
pub use json::{
    from_json_value, parse_json, parse_json_as, to_dynamic, to_json, to_json_value, JsonBridge,
};
pub use object::{
    has, is_dynamic_object, is_empty_object, to_key_value_list, DynamicList, DynamicObject,
};
pub use truthy::{is_truthy, Truthy};
pub use value::{HostObject, Value};
