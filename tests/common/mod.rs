//! Shared fixtures: on-disk registry projects and a scripted fake runner

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use event_schemas::config::ProjectConfig;
use event_schemas::loader::read_project_folder;
use event_schemas::{
    Project, ProjectStructureValidationService, TransformationException, ValidationService,
};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

pub type RunResult = Result<Option<Value>, TransformationException>;
pub type Runner = fn(&str, &Path, &Map<String, Value>) -> RunResult;

/// Builds a registry project inside a temporary directory
pub struct ProjectBuilder {
    dir: TempDir,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.md"), "# Registry\n").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Add a version with its schema and named examples
    pub fn version(&self, namespace: &str, event: &str, version: u32, schema: Value, examples: &[(&str, Value)]) -> &Self {
        let ns_dir = self.path(namespace);
        let event_dir = ns_dir.join(event);
        let version_dir = event_dir.join(version.to_string());
        fs::create_dir_all(version_dir.join("examples")).unwrap();

        fs::write(ns_dir.join("index.md"), format!("# {namespace}\n")).unwrap();
        fs::write(event_dir.join("index.md"), format!("# {event}\n")).unwrap();
        fs::write(version_dir.join("index.md"), format!("# {event} v{version}\n")).unwrap();
        fs::write(version_dir.join("schema.json"), schema.to_string()).unwrap();

        for (name, example) in examples {
            fs::write(version_dir.join("examples").join(format!("{name}.json")), example.to_string()).unwrap();
        }
        self
    }

    /// Add a transformation whose script is a [`recipe_runner`] recipe
    pub fn transformation(&self, namespace: &str, event: &str, from: u32, to: u32, recipe: Value) -> &Self {
        let dir = self.path(&format!("{namespace}/{event}/transformations/{from}-{to}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("transform.js"), recipe.to_string()).unwrap();
        self
    }

    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Read the tree and build the typed project; panics on structure errors
    pub fn project(&self) -> Project {
        let folder = read_project_folder(self.root(), &ProjectConfig::default(), "transform.js").unwrap();
        ProjectStructureValidationService::new()
            .validate_project_structure(&folder)
            .unwrap()
    }
}

/// Fake script runner.
///
/// Script files hold a JSON recipe instead of JavaScript:
/// `{"throw": "msg"}`, `{"skip": true}`, `{"set": {...}, "remove": [...]}`.
pub fn recipe_runner(function: &str, script: &Path, input: &Map<String, Value>) -> RunResult {
    assert_eq!(function, "transform");
    let recipe: Value = serde_json::from_str(&fs::read_to_string(script).unwrap()).unwrap();

    if let Some(message) = recipe.get("throw").and_then(Value::as_str) {
        return Err(TransformationException::new(message));
    }
    if recipe.get("skip").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(None);
    }

    let mut output = input.clone();
    if let Some(set) = recipe.get("set").and_then(Value::as_object) {
        for (key, value) in set {
            output.insert(key.clone(), value.clone());
        }
    }
    if let Some(remove) = recipe.get("remove").and_then(Value::as_array) {
        for key in remove.iter().filter_map(Value::as_str) {
            output.remove(key);
        }
    }
    Ok(Some(Value::Object(output)))
}

pub fn validation_service() -> ValidationService<Runner> {
    ValidationService::with_runner(recipe_runner as Runner, "transform")
}

/// Orders with an id only; extra fields rejected
pub fn order_v1_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "id": { "type": "string" } },
        "required": ["id"],
        "additionalProperties": false
    })
}

/// Orders with an id and a required amount
pub fn order_v2_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string" },
            "amount": { "type": "number" }
        },
        "required": ["id", "amount"],
        "additionalProperties": false
    })
}

/// Two versions with upcast and downcast declared; fully valid
pub fn order_project() -> ProjectBuilder {
    let builder = ProjectBuilder::new();
    builder
        .version("shop", "OrderPlaced", 1, order_v1_schema(), &[("basic", json!({"id": "o-1"}))])
        .version(
            "shop",
            "OrderPlaced",
            2,
            order_v2_schema(),
            &[("basic", json!({"id": "o-1", "amount": 10})), ("large", json!({"id": "o-2", "amount": 999}))],
        )
        .transformation("shop", "OrderPlaced", 1, 2, json!({"set": {"amount": 0}}))
        .transformation("shop", "OrderPlaced", 2, 1, json!({"remove": ["amount"]}));
    builder
}
