//! Transformation Evaluation
//!
//! Runs a user-authored transformation script over one JSON document. Script
//! execution itself is a capability behind [`ScriptRunner`]; the evaluator
//! owns the conversion between documents and the maps scripts work on.
//!
//! Script runtimes do not always hand arrays back as arrays. Typed arrays and
//! similar values serialize as objects keyed `"0".."n-1"`, so results are
//! rewritten before they are treated as documents again.

mod node;

pub use node::NodeScriptRunner;

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// A transformation script failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransformationException {
    pub message: String,
}

impl TransformationException {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Executes a function defined by a script file.
///
/// `Ok(None)` means the script deliberately produced no document (skip).
pub trait ScriptRunner {
    fn run(
        &self,
        function: &str,
        script: &Path,
        input: &Map<String, Value>,
    ) -> Result<Option<Value>, TransformationException>;
}

impl<F> ScriptRunner for F
where
    F: Fn(&str, &Path, &Map<String, Value>) -> Result<Option<Value>, TransformationException>,
{
    fn run(
        &self,
        function: &str,
        script: &Path,
        input: &Map<String, Value>,
    ) -> Result<Option<Value>, TransformationException> {
        self(function, script, input)
    }
}

pub const TRANSFORM_FUNCTION: &str = "transform";

/// Applies transformation scripts to documents
pub struct TransformationEvaluator<R> {
    runner: R,
    function: String,
}

impl<R: ScriptRunner> TransformationEvaluator<R> {
    pub fn new(runner: R) -> Self {
        Self::with_function(runner, TRANSFORM_FUNCTION)
    }

    pub fn with_function(runner: R, function: impl Into<String>) -> Self {
        Self {
            runner,
            function: function.into(),
        }
    }

    /// Transform `input` with the script at `script`.
    ///
    /// Returns `Ok(None)` when the script skipped the document.
    pub fn evaluate(
        &self,
        script: &Path,
        input: &Value,
    ) -> Result<Option<Value>, TransformationException> {
        let input = input
            .as_object()
            .ok_or_else(|| TransformationException::new("input document is not a JSON object"))?;

        tracing::debug!(script = %script.display(), function = %self.function, "running transformation");
        let output = match self.runner.run(&self.function, script, input)? {
            None => return Ok(None),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(TransformationException::new(format!(
                    "{} returned {} instead of an object",
                    self.function,
                    json_type(&other)
                )))
            }
        };

        Ok(Some(Value::Object(normalize_map(output))))
    }
}

/// Rewrite array-like objects nested anywhere in `map` into arrays
pub fn normalize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (key, normalize_value(value)))
        .collect()
}

fn normalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let map = normalize_map(map);
            if is_array_like(&map) {
                let mut items: Vec<(usize, Value)> = map
                    .into_iter()
                    .filter_map(|(key, value)| key.parse().ok().map(|i| (i, value)))
                    .collect();
                items.sort_by_key(|(i, _)| *i);
                Value::Array(items.into_iter().map(|(_, value)| value).collect())
            } else {
                Value::Object(map)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_value).collect()),
        scalar => scalar,
    }
}

/// Non-empty and keyed exactly `"0".."n-1"`
fn is_array_like(map: &Map<String, Value>) -> bool {
    let len = map.len();
    len > 0
        && map.keys().all(|key| {
            let canonical = key == "0" || !key.starts_with('0');
            canonical
                && key.bytes().all(|b| b.is_ascii_digit())
                && key.parse::<usize>().map(|i| i < len).unwrap_or(false)
        })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
