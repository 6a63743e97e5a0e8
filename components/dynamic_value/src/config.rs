//! Codec configuration for the JSON bridge.
//!
//! Options are passed explicitly to [`crate::JsonBridge`]; there is no
//! process-wide serializer state. The record is itself deserializable so a
//! host can embed it in its own configuration file.

use serde::{Deserialize, Serialize};

/// How NaN and the infinities are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonFiniteNumbers {
    /// Written as `null`, like `JSON.stringify`
    #[default]
    Null,
    /// Rejected with [`crate::SerializationError::NonFiniteNumber`]
    Error,
}

/// Serialization options.
///
/// # Examples
///
/// ```
/// use dynamic_value::{JsonOptions, NonFiniteNumbers};
///
/// let options = JsonOptions::default().with_pretty(true);
/// assert!(options.pretty);
/// assert!(!options.omit_null_properties);
/// assert_eq!(options.non_finite, NonFiniteNumbers::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Indent the output
    pub pretty: bool,
    /// Drop object members whose value is null
    pub omit_null_properties: bool,
    /// Policy for NaN and infinities
    pub non_finite: NonFiniteNumbers,
}

impl JsonOptions {
    /// Set indented output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set whether null members are dropped
    pub fn with_omit_null_properties(mut self, omit: bool) -> Self {
        self.omit_null_properties = omit;
        self
    }

    /// Set the non-finite number policy
    pub fn with_non_finite(mut self, policy: NonFiniteNumbers) -> Self {
        self.non_finite = policy;
        self
    }
}
