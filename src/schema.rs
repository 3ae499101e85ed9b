//! JSON Schema loading and document validation

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::ProjectError;
use crate::loader;

/// A single validation violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the offending part of the document
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that rejected it
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Outcome of validating one document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl From<Vec<Violation>> for ValidationReport {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A schema file compiled for repeated validation
pub struct CompiledSchema {
    path: PathBuf,
    compiled: JSONSchema,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema").field("path", &self.path).finish()
    }
}

impl CompiledSchema {
    /// Compile an in-memory schema; `path` is only used for reporting
    pub fn compile(path: &Path, schema: &Value) -> Result<Self, ProjectError> {
        let compiled = JSONSchema::compile(schema).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "schema does not compile");
            ProjectError::NoSchema {
                path: path.to_path_buf(),
            }
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            compiled,
        })
    }

    pub fn validate(&self, document: &Value) -> ValidationReport {
        match self.compiled.validate(document) {
            Ok(()) => ValidationReport::success(),
            Err(errors) => errors
                .map(|error| Violation {
                    instance_path: error.instance_path.to_string(),
                    schema_path: error.schema_path.to_string(),
                    message: error.to_string(),
                })
                .collect::<Vec<_>>()
                .into(),
        }
    }
}

/// Loads schema files
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidationService;

impl SchemaValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Load and compile the schema at `path`.
    ///
    /// A missing, unreadable or non-compiling file is reported as `NoSchema`.
    pub fn load_schema(&self, path: &Path) -> Result<CompiledSchema, ProjectError> {
        tracing::debug!(path = %path.display(), "loading schema");
        let schema = loader::read_json(path).map_err(|_| ProjectError::NoSchema {
            path: path.to_path_buf(),
        })?;
        CompiledSchema::compile(path, &schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "integer" }
            },
            "required": ["name"]
        })
    }

    #[test]
    fn test_validate_document() {
        let schema = CompiledSchema::compile(Path::new("schema.json"), &person_schema()).unwrap();
        assert!(schema.validate(&json!({"name": "Ada"})).is_success());

        let report = schema.validate(&json!({"age": "old"}));
        assert!(!report.is_success());
        assert_eq!(report.violations().len(), 2);
    }

    #[test]
    fn test_load_missing_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.json");
        let err = SchemaValidationService::new().load_schema(&path).unwrap_err();
        assert_eq!(err, ProjectError::NoSchema { path });
    }

    #[test]
    fn test_load_malformed_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(SchemaValidationService::new().load_schema(&path).is_err());

        fs::write(&path, r#"{"type": 12}"#).unwrap();
        let err = SchemaValidationService::new().load_schema(&path).unwrap_err();
        assert_eq!(err, ProjectError::NoSchema { path });
    }
}
