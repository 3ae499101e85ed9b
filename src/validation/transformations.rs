//! Transformation validation
//!
//! Three independent passes whose errors are concatenated:
//!
//! 1. every neighbouring version pair has a declared upcast,
//! 2. every declared transformation connects existing versions and turns each
//!    example of its source version into a valid document of its target version,
//! 3. every neighbouring pair without a declared downcast can be downcast as a
//!    no-op, i.e. the higher version's examples already satisfy the lower
//!    version's schema. These pairs become synthetic index entries.

use serde_json::Value;

use crate::error::{EventRef, ProjectError, TransformationFailure};
use crate::loader;
use crate::missing::{MissingTransformationCalculator, VersionPair};
use crate::model::{Event, Example, Namespace, Project, Transformation};
use crate::schema::{CompiledSchema, SchemaValidationService};
use crate::transform::{ScriptRunner, TransformationEvaluator};

pub struct TransformationValidationService<R> {
    schemas: SchemaValidationService,
    evaluator: TransformationEvaluator<R>,
    calculator: MissingTransformationCalculator,
}

impl<R: ScriptRunner> TransformationValidationService<R> {
    pub fn new(
        schemas: SchemaValidationService,
        evaluator: TransformationEvaluator<R>,
        calculator: MissingTransformationCalculator,
    ) -> Self {
        Self {
            schemas,
            evaluator,
            calculator,
        }
    }

    /// Errors from all three passes, in pass order
    pub fn validate_transformations(&self, project: &Project) -> Vec<ProjectError> {
        let mut errors = self.missing_upcast_errors(project);
        errors.extend(self.calculate_validation_errors(project));
        errors.extend(self.synthetic_downcast_errors(project));
        errors
    }

    /// Neighbouring versions without a declared upcast
    pub fn missing_upcast_errors(&self, project: &Project) -> Vec<ProjectError> {
        project
            .events()
            .flat_map(|(namespace, event)| {
                let event_ref = namespace.event_ref(event);
                self.calculator
                    .calculate_upcast_transformations(event)
                    .into_iter()
                    .map(move |VersionPair { from, to }| ProjectError::NoUpcastForVersion {
                        event: event_ref.clone(),
                        from,
                        to,
                    })
            })
            .collect()
    }

    /// Problems with declared transformations
    pub fn calculate_validation_errors(&self, project: &Project) -> Vec<ProjectError> {
        let mut errors = Vec::new();
        for (namespace, event, transformation) in project.event_transformations() {
            self.check_transformation(namespace, event, transformation, &mut errors);
        }
        errors
    }

    fn check_transformation(
        &self,
        namespace: &Namespace,
        event: &Event,
        transformation: &Transformation,
        errors: &mut Vec<ProjectError>,
    ) {
        let (source, target) = match (event.version(transformation.from), event.version(transformation.to)) {
            (Some(source), Some(target)) => (source, target),
            _ => {
                errors.push(ProjectError::MissingVersionForTransformation {
                    event: namespace.event_ref(event),
                    from: transformation.from,
                    to: transformation.to,
                    path: transformation.transformation_path.clone(),
                });
                return;
            }
        };

        let target_schema = match self.schemas.load_schema(&target.schema_path) {
            Ok(schema) => schema,
            Err(err) => {
                errors.push(err);
                return;
            }
        };

        for example in &source.examples {
            let Some(document) = read_example(example) else {
                continue;
            };
            if let Some(failure) = self.apply(transformation, &document, &target_schema) {
                errors.push(ProjectError::TransformationValidationError {
                    example: example.example_file_path.clone(),
                    transformation: transformation.transformation_path.clone(),
                    failure,
                });
            }
        }
    }

    /// Run one example through a transformation, returning what went wrong
    fn apply(
        &self,
        transformation: &Transformation,
        document: &Value,
        target_schema: &CompiledSchema,
    ) -> Option<TransformationFailure> {
        match self.evaluator.evaluate(transformation.path(), document) {
            Err(e) => Some(TransformationFailure::ScriptFailed(e.message)),
            Ok(None) => {
                tracing::warn!(
                    transformation = %transformation.path().display(),
                    "transformation skipped the document"
                );
                None
            }
            Ok(Some(output)) => {
                let report = target_schema.validate(&output);
                (!report.is_success()).then_some(TransformationFailure::InvalidOutput(report))
            }
        }
    }

    /// Neighbouring pairs without a declared downcast whose examples do not
    /// fit the lower version's schema as they are
    pub fn synthetic_downcast_errors(&self, project: &Project) -> Vec<ProjectError> {
        let mut errors = Vec::new();

        for (namespace, event) in project.events() {
            let event_ref = namespace.event_ref(event);
            for pair in self.calculator.calculate_downcast_transformations(event) {
                if let Err(err) = self.check_noop_downcast(&event_ref, event, pair) {
                    errors.push(err);
                }
            }
        }

        errors
    }

    fn check_noop_downcast(
        &self,
        event_ref: &EventRef,
        event: &Event,
        pair: VersionPair,
    ) -> Result<(), ProjectError> {
        // The calculator only yields pairs of existing versions.
        let (Some(higher), Some(lower)) = (event.version(pair.from), event.version(pair.to)) else {
            return Ok(());
        };

        let lower_schema = self.schemas.load_schema(&lower.schema_path)?;

        let failing: Vec<_> = higher
            .examples
            .iter()
            .filter(|example| {
                read_example(example)
                    .map(|document| !lower_schema.validate(&document).is_success())
                    .unwrap_or(false)
            })
            .map(|example| example.example_file_path.clone())
            .collect();

        if failing.is_empty() {
            return Ok(());
        }
        Err(ProjectError::NoDowncastForVersion {
            event: event_ref.clone(),
            from: pair.from,
            to: pair.to,
            examples: failing,
        })
    }
}

/// Unreadable examples are reported by example validation, not here
fn read_example(example: &Example) -> Option<Value> {
    match loader::read_json(&example.example_file_path) {
        Ok(document) => Some(document),
        Err(_) => {
            tracing::debug!(example = %example.example_file_path.display(), "skipping unreadable example");
            None
        }
    }
}
