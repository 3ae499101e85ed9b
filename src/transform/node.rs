//! Runs transformation scripts with an external JavaScript runtime

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ScriptRunner, TransformationException};

/// Prefix of the stderr line carrying a script failure as JSON
const ERROR_MARKER: &str = "EVENT_SCHEMAS_ERROR ";

/// Evaluates the script in a fresh `vm` context, calls the requested function
/// with the document read from stdin and prints the result as JSON.
///
/// Top-level `const`/`let` bindings are not properties of the context, so the
/// function is resolved by name inside it before falling back to
/// `module.exports`. Any exception is reported on one marker line.
const HARNESS: &str = r#"
const fs = require('fs');
const vm = require('vm');
const script = process.env.EVENT_SCHEMAS_SCRIPT;
const name = process.env.EVENT_SCHEMAS_FUNCTION;
const marker = process.env.EVENT_SCHEMAS_ERROR_MARKER;
try {
  const sandbox = { module: { exports: {} }, console: { log() {}, warn() {}, error() {} } };
  sandbox.exports = sandbox.module.exports;
  vm.createContext(sandbox);
  vm.runInContext(fs.readFileSync(script, 'utf8'), sandbox, { filename: script });
  let fn = /^[A-Za-z_$][\w$]*$/.test(name)
    ? vm.runInContext(`typeof ${name} === 'function' ? ${name} : undefined`, sandbox)
    : undefined;
  if (typeof fn !== 'function') {
    fn = sandbox.module.exports[name];
  }
  if (typeof fn !== 'function') {
    throw new Error(`${script} does not define a ${name} function`);
  }
  const result = fn(JSON.parse(fs.readFileSync(0, 'utf8')));
  process.stdout.write(JSON.stringify(result === undefined ? null : result));
} catch (e) {
  const error = e !== null && typeof e === 'object'
    ? { name: String(e.name || ''), message: String(e.message === undefined ? e : e.message) }
    : { name: '', message: String(e) };
  process.stderr.write(`\n${marker}${JSON.stringify(error)}\n`);
  process.exitCode = 1;
}
"#;

/// Exception reported by the harness
#[derive(Debug, Deserialize)]
struct ScriptError {
    #[serde(default)]
    name: String,
    message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

/// [`ScriptRunner`] backed by a `node` compatible binary
#[derive(Debug, Clone)]
pub struct NodeScriptRunner {
    program: PathBuf,
}

impl NodeScriptRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NodeScriptRunner {
    fn default() -> Self {
        Self::new("node")
    }
}

impl ScriptRunner for NodeScriptRunner {
    fn run(
        &self,
        function: &str,
        script: &Path,
        input: &Map<String, Value>,
    ) -> Result<Option<Value>, TransformationException> {
        let payload = serde_json::to_vec(input)
            .map_err(|e| TransformationException::new(format!("cannot encode input: {}", e)))?;

        let mut child = Command::new(&self.program)
            .arg("-e")
            .arg(HARNESS)
            .env("EVENT_SCHEMAS_SCRIPT", script)
            .env("EVENT_SCHEMAS_FUNCTION", function)
            .env("EVENT_SCHEMAS_ERROR_MARKER", ERROR_MARKER)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TransformationException::new(format!(
                    "cannot start {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        // The harness reads all of stdin before writing anything. It may also
        // fail before reading, in which case its stderr explains why.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransformationException::new("stdin unavailable"))?;
        match stdin.write_all(&payload) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(e) => {
                return Err(TransformationException::new(format!("cannot send input: {}", e)))
            }
        }
        drop(stdin);

        let output = child
            .wait_with_output()
            .map_err(|e| TransformationException::new(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransformationException::new(error_summary(&stderr)));
        }

        let result: Value = serde_json::from_slice(&output.stdout).map_err(|e| {
            TransformationException::new(format!("invalid output from {}: {}", script.display(), e))
        })?;

        match result {
            Value::Null => Ok(None),
            other => Ok(Some(other)),
        }
    }
}

/// The exception reported by the harness.
///
/// Falls back to the first line of the form `SomeError: message`, then to the
/// whole of stderr. Runtimes print the offending source line before the
/// exception, so a line merely mentioning an error is not enough.
fn error_summary(stderr: &str) -> String {
    let reported = stderr
        .lines()
        .rev()
        .filter_map(|line| line.strip_prefix(ERROR_MARKER))
        .find_map(|json| serde_json::from_str::<ScriptError>(json).ok());
    if let Some(error) = reported {
        return error.to_string();
    }

    stderr
        .lines()
        .find(|line| is_exception_line(line))
        .unwrap_or(stderr)
        .trim()
        .to_string()
}

fn is_exception_line(line: &str) -> bool {
    match line.split_once(": ") {
        Some((name, _)) => {
            name.ends_with("Error") && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}
