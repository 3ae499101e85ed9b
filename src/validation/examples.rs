//! Example validation

use crate::error::ProjectError;
use crate::loader;
use crate::model::Project;
use crate::schema::SchemaValidationService;

/// Checks every example against the schema of its own version
#[derive(Debug, Clone, Copy, Default)]
pub struct ExampleValidationService {
    schemas: SchemaValidationService,
}

impl ExampleValidationService {
    pub fn new(schemas: SchemaValidationService) -> Self {
        Self { schemas }
    }

    /// All example problems in `project`.
    ///
    /// A version whose schema does not load yields one error and its examples
    /// are not read.
    pub fn validate_examples(&self, project: &Project) -> Vec<ProjectError> {
        let mut errors = Vec::new();

        for (namespace, event, version) in project.event_versions() {
            let schema = match self.schemas.load_schema(&version.schema_path) {
                Ok(schema) => schema,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };

            for example in &version.examples {
                let path = &example.example_file_path;
                tracing::debug!(
                    event = %namespace.event_ref(event),
                    version = version.version,
                    example = %example.name,
                    "validating example"
                );
                let document = match loader::read_json(path) {
                    Ok(document) => document,
                    Err(err) => {
                        errors.push(err);
                        continue;
                    }
                };

                let report = schema.validate(&document);
                if !report.is_success() {
                    errors.push(ProjectError::ValidationError {
                        path: path.clone(),
                        report,
                    });
                }
            }
        }

        errors
    }
}
