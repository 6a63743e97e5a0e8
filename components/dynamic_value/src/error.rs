//! Error types for conversion, parsing and serialization.
//!
//! Only the explicitly typed conversion and the JSON bridge can fail. The
//! accessor-style operations (`get`, `has`, `is_truthy`, ...) are total and
//! never produce these errors.

use std::fmt;

use thiserror::Error;

/// A value could not be coerced to the requested target type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The value's shape is incompatible with the target (e.g. a list to a number).
    #[error("cannot convert {found} to {expected}")]
    Mismatch {
        /// What the target type asked for
        expected: String,
        /// Shape of the value that was supplied
        found: &'static str,
    },

    /// A string could not be parsed as the requested primitive.
    #[error("cannot parse {text:?} as {target}")]
    InvalidText {
        /// The offending text
        text: String,
        /// Target primitive name
        target: &'static str,
    },

    /// A number does not fit the requested numeric type.
    #[error("{value} is out of range for {target}")]
    OutOfRange {
        /// Display form of the number
        value: String,
        /// Target numeric type
        target: &'static str,
    },

    /// A record field without a declared default was absent from the source.
    ///
    /// [`crate::convert`] recovers from this by feeding `null` to the field.
    #[error("missing field `{field}` in {record}")]
    MissingField {
        /// Record type name; empty until the enclosing record is known
        record: &'static str,
        /// Declared field name
        field: &'static str,
    },

    /// Raised by a target type's own deserialization logic.
    #[error("{0}")]
    Custom(String),
}

impl serde::de::Error for ConversionError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ConversionError::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        ConversionError::MissingField { record: "", field }
    }
}

/// Malformed JSON text. No partial result is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed JSON at line {line}, column {column}: {message}")]
pub struct ParseError {
    /// 1-based line of the failure
    pub line: usize,
    /// 1-based column of the failure
    pub column: usize,
    /// Codec diagnostic
    pub message: String,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// A value graph has no JSON representation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerializationError {
    /// A container reaches itself through its own children.
    #[error("value graph contains a reference cycle")]
    CyclicGraph,

    /// NaN or an infinity met while non-finite numbers are rejected.
    #[error("non-finite number {0} has no JSON representation")]
    NonFiniteNumber(f64),

    /// A typed host value failed to serialize itself.
    #[error("unsupported value: {0}")]
    Unsupported(String),
}

/// Any failure raised by the JSON bridge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    /// Input text was not valid JSON
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Parsed tree did not fit the requested type
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Value graph could not be written as JSON
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// Result type for typed conversions
pub type ConvertResult<T> = Result<T, ConversionError>;

/// Result type for JSON bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
