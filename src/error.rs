//! Error types for the schema registry

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::ValidationReport;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Identifies an event type inside a project (`namespace/eventType`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventRef {
    pub namespace: String,
    pub event_type: String,
}

impl EventRef {
    pub fn new(namespace: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            event_type: event_type.into(),
        }
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.event_type)
    }
}

/// Why a declared transformation failed for one example
#[derive(Debug, Clone, PartialEq)]
pub enum TransformationFailure {
    /// The script threw or produced something unusable
    ScriptFailed(String),
    /// The script output does not satisfy the target schema
    InvalidOutput(ValidationReport),
}

impl fmt::Display for TransformationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformationFailure::ScriptFailed(message) => write!(f, "script failed: {}", message),
            TransformationFailure::InvalidOutput(report) => {
                write!(f, "output does not match target schema:\n{}", report)
            }
        }
    }
}

/// Problems found in a registry project.
///
/// Validators never stop at the first one; every stage returns the full list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectError {
    #[error("Missing description (index.md) in {path:?}")]
    NoDescription { path: PathBuf },

    #[error("Project {path:?} has no namespaces")]
    NoNamespaces { path: PathBuf },

    #[error("Namespace {path:?} has no events")]
    NoEvents { path: PathBuf },

    #[error("Event {path:?} has no versions")]
    NoEventVersions { path: PathBuf },

    #[error("Missing or invalid schema: {path:?}")]
    NoSchema { path: PathBuf },

    #[error("Version {path:?} has no examples")]
    NoExamples { path: PathBuf },

    #[error("Wrong version format: {path:?}")]
    WrongVersionFormat { path: PathBuf },

    #[error("No such file: {path:?}")]
    NoSuchFile { path: PathBuf },

    #[error("Example {path:?} does not match its schema:\n{report}")]
    ValidationError { path: PathBuf, report: ValidationReport },

    #[error("Transformation {transformation:?} failed for example {example:?}: {failure}")]
    TransformationValidationError {
        example: PathBuf,
        transformation: PathBuf,
        failure: TransformationFailure,
    },

    #[error("{event}: no upcast transformation from version {from} to {to}")]
    NoUpcastForVersion { event: EventRef, from: u32, to: u32 },

    #[error(
        "{event}: no downcast transformation from version {from} to {to}, and {} example(s) of version {from} do not match the schema of version {to}",
        .examples.len()
    )]
    NoDowncastForVersion {
        event: EventRef,
        from: u32,
        to: u32,
        examples: Vec<PathBuf>,
    },

    #[error("{event}: transformation {from}-{to} ({path:?}) references a version that does not exist")]
    MissingVersionForTransformation {
        event: EventRef,
        from: u32,
        to: u32,
        path: PathBuf,
    },
}

/// Errors that abort a registry command
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid project path: {0:?}")]
    InvalidProjectPath(PathBuf),

    #[error("Project validation failed with {} error(s)", .0.len())]
    Validation(Vec<ProjectError>),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
