//! Error types for the CLI

use dynamic_value::{BridgeError, ParseError, SerializationError};
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Conversion or serialization failed
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl From<SerializationError> for CliError {
    fn from(err: SerializationError) -> Self {
        CliError::Bridge(err.into())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
