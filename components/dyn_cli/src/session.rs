//! Command execution
//!
//! A [`Session`] parses one document and runs a single [`Command`] against
//! it, producing the text to print and the process exit status.

use std::io::Read;
use std::path::Path;

use dynamic_value::{to_dynamic, to_key_value_list, JsonBridge, JsonOptions, Value};

use crate::cli::Command;
use crate::error::CliResult;

/// Result of running a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Text for stdout, without trailing newline
    pub output: String,
    /// Process exit status
    pub status: i32,
}

impl Outcome {
    fn success(output: String) -> Self {
        Outcome { output, status: 0 }
    }
}

/// Runs commands with a fixed set of serialization options
#[derive(Debug, Clone, Default)]
pub struct Session {
    bridge: JsonBridge,
}

impl Session {
    /// Create a session
    ///
    /// # Example
    /// ```
    /// use dyn_cli::{Command, Session};
    /// use dynamic_value::JsonOptions;
    ///
    /// let session = Session::new(JsonOptions::default());
    /// let outcome = session.run(&Command::Fmt, r#"{ "a" : 1 }"#).unwrap();
    /// assert_eq!(outcome.output, r#"{"a":1}"#);
    /// ```
    pub fn new(options: JsonOptions) -> Self {
        Session {
            bridge: JsonBridge::new(options),
        }
    }

    /// Parse `input` and run `command` against it
    pub fn run(&self, command: &Command, input: &str) -> CliResult<Outcome> {
        let root = self.bridge.parse_json(input)?;
        tracing::debug!(?command, kind = root.type_name(), "running command");

        match command {
            Command::Fmt => Ok(Outcome::success(self.bridge.to_json(&root)?)),
            Command::Get { path } => {
                let found = lookup(&root, path);
                Ok(Outcome::success(self.bridge.to_json(&found)?))
            }
            Command::Truthy { path } => {
                let truthy = lookup(&root, path).is_truthy();
                Ok(Outcome {
                    output: truthy.to_string(),
                    status: if truthy { 0 } else { 1 },
                })
            }
            Command::Keys { path } => {
                let target = match path {
                    Some(path) => lookup(&root, path),
                    None => root,
                };
                // One member per line, so never indent.
                let line_bridge =
                    JsonBridge::new(self.bridge.options().clone().with_pretty(false));
                let mut lines = Vec::new();
                for (key, value) in to_key_value_list(to_dynamic(&target).as_ref()) {
                    lines.push(format!("{}\t{}", key, line_bridge.to_json(&value)?));
                }
                Ok(Outcome::success(lines.join("\n")))
            }
        }
    }
}

/// Follow a dotted path from `root`.
///
/// Segments name object members; on lists a segment must be an index. An
/// empty path is the root itself. Anything unreachable is null.
pub fn lookup(root: &Value, path: &str) -> Value {
    if path.is_empty() {
        return root.clone();
    }
    let mut current = root.clone();
    for segment in path.split('.') {
        let next = match &current {
            Value::Object(obj) => obj.get_value(segment),
            Value::List(list) => segment.parse::<usize>().ok().and_then(|i| list.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current
}

/// Read the whole document from `file`, or from stdin when absent.
pub fn read_input(file: Option<&Path>) -> CliResult<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
