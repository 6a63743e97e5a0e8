//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dynamic_value::{JsonOptions, NonFiniteNumbers};

/// Inspect and reformat JSON documents through dynamic values
#[derive(Debug, Parser)]
#[command(name = "dynjson", version, about)]
pub struct Cli {
    /// Read the document from FILE instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Indent the output
    #[arg(long)]
    pub pretty: bool,

    /// Drop object members whose value is null
    #[arg(long)]
    pub omit_nulls: bool,

    /// Fail on NaN and infinities instead of writing null
    #[arg(long)]
    pub strict_numbers: bool,

    /// What to do with the document
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Parse and re-serialize the document
    Fmt,
    /// Print the value at a dotted path, or null
    Get {
        /// Dotted key path; numeric segments index lists
        path: String,
    },
    /// Print whether the value at a path is truthy; exit status 1 when falsy
    Truthy {
        /// Dotted key path
        path: String,
    },
    /// List the members of the object at a path (the root when omitted)
    Keys {
        /// Dotted key path
        path: Option<String>,
    },
}

impl Cli {
    /// Serialization options selected by the flags
    pub fn options(&self) -> JsonOptions {
        let non_finite = if self.strict_numbers {
            NonFiniteNumbers::Error
        } else {
            NonFiniteNumbers::Null
        };
        JsonOptions::default()
            .with_pretty(self.pretty)
            .with_omit_null_properties(self.omit_nulls)
            .with_non_finite(non_finite)
    }
}
