//! Project validation
//!
//! Structure validation builds the typed [`Project`]; example and
//! transformation validation then run over it. Every stage reports all of
//! its problems instead of stopping at the first.

mod examples;
mod structure;
mod transformations;

pub use examples::ExampleValidationService;
pub use structure::ProjectStructureValidationService;
pub use transformations::TransformationValidationService;

use std::path::Path;

use crate::config::RegistryConfig;
use crate::error::{ProjectError, RegistryError, Result};
use crate::loader;
use crate::missing::MissingTransformationCalculator;
use crate::model::Project;
use crate::schema::SchemaValidationService;
use crate::transform::{ScriptRunner, TransformationEvaluator};

/// Content validation of a structurally valid project
pub struct ValidationService<R> {
    examples: ExampleValidationService,
    transformations: TransformationValidationService<R>,
}

impl<R: ScriptRunner> ValidationService<R> {
    pub fn new(
        examples: ExampleValidationService,
        transformations: TransformationValidationService<R>,
    ) -> Self {
        Self {
            examples,
            transformations,
        }
    }

    /// Wire the default services around a script runner
    pub fn with_runner(runner: R, function: impl Into<String>) -> Self {
        let schemas = SchemaValidationService::new();
        Self::new(
            ExampleValidationService::new(schemas),
            TransformationValidationService::new(
                schemas,
                TransformationEvaluator::with_function(runner, function),
                MissingTransformationCalculator::new(),
            ),
        )
    }

    /// Every example and transformation problem; empty means valid
    pub fn validate(&self, project: &Project) -> Vec<ProjectError> {
        let mut errors = self.examples.validate_examples(project);
        tracing::info!(errors = errors.len(), "examples validated");

        let transformation_errors = self.transformations.validate_transformations(project);
        tracing::info!(errors = transformation_errors.len(), "transformations validated");

        errors.extend(transformation_errors);
        errors
    }
}

/// Read, structure-check and content-check the project at `root`
pub fn load_project<R: ScriptRunner>(
    root: &Path,
    config: &RegistryConfig,
    validation: &ValidationService<R>,
) -> Result<Project> {
    let folder = loader::read_project_folder(root, &config.project, &config.transform.script_file)?;

    let project = ProjectStructureValidationService::new()
        .validate_project_structure(&folder)
        .map_err(RegistryError::Validation)?;
    tracing::info!(namespaces = project.namespaces.len(), "project structure is valid");

    let errors = validation.validate(&project);
    if !errors.is_empty() {
        return Err(RegistryError::Validation(errors));
    }
    Ok(project)
}
