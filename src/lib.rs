//! Event Schema Registry
//!
//! Validates and packages a schema registry project: namespaced event types,
//! their integer-numbered JSON Schema versions, example documents and the
//! JavaScript transformations that upcast and downcast events between
//! versions.
//!
//! ## Features
//!
//! - **Structure Validation**: Folder layout, descriptions and version naming
//! - **Example Validation**: Every example matches its version's schema
//! - **Transformation Validation**: Declared scripts produce valid documents,
//!   missing upcasts are reported and missing downcasts must be no-ops
//! - **Content Index**: Schema and transformation ids with content hashes
//!
//! ## Pipeline
//!
//! ```text
//! folder tree ──▶ structure validation ──▶ Project
//!                                            │
//!                     example + transformation validation
//!                                            │
//!                                            ▼
//!                     index calculation ──▶ dist/index.json
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod missing;
pub mod model;
pub mod registry;
pub mod schema;
pub mod transform;
pub mod validation;
pub mod version;

pub use checksum::{Checksum, ChecksumAlgorithm, ChecksumService};
pub use config::RegistryConfig;
pub use error::{EventRef, ProjectError, RegistryError, Result, TransformationFailure};
pub use index::{Index, IndexFileCalculator, SchemaDescriptor, TransformationDescriptor};
pub use missing::{MissingTransformationCalculator, VersionPair};
pub use model::{Event, Example, Namespace, Project, Transformation, Version};
pub use registry::Distribution;
pub use schema::{CompiledSchema, SchemaValidationService, ValidationReport};
pub use transform::{NodeScriptRunner, ScriptRunner, TransformationEvaluator, TransformationException};
pub use validation::{
    ExampleValidationService, ProjectStructureValidationService, TransformationValidationService,
    ValidationService,
};
