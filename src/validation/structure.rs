//! Project structure validation
//!
//! Turns the raw folder tree into a typed [`Project`], collecting every
//! structural problem across the whole tree before giving up.

use std::path::{Path, PathBuf};

use crate::error::ProjectError;
use crate::loader::{
    EventFolder, NamespaceFolder, ProjectFolder, TransformationFolder, VersionFolder, SCHEMA_FILE,
};
use crate::model::{Event, Example, Namespace, Project, Transformation, Version};
use crate::version::{parse_transformation, parse_version};

type Checked<T> = Result<T, Vec<ProjectError>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectStructureValidationService;

impl ProjectStructureValidationService {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_project_structure(&self, folder: &ProjectFolder) -> Checked<Project> {
        let mut errors = Vec::new();

        if folder.description.is_none() {
            errors.push(ProjectError::NoDescription {
                path: folder.path.clone(),
            });
        }
        if folder.namespaces.is_empty() {
            errors.push(ProjectError::NoNamespaces {
                path: folder.path.clone(),
            });
        }

        let namespaces = collect(folder.namespaces.iter().map(validate_namespace), &mut errors);

        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "project structure is invalid");
            return Err(errors);
        }
        Ok(Project {
            description: folder.description.clone(),
            namespaces,
        })
    }
}

fn validate_namespace(folder: &NamespaceFolder) -> Checked<Namespace> {
    let mut errors = Vec::new();

    if folder.events.is_empty() {
        errors.push(ProjectError::NoEvents {
            path: folder.path.clone(),
        });
    }
    let description = require_description(&folder.description, &folder.path, &mut errors);
    let events = collect(folder.events.iter().map(validate_event), &mut errors);

    match description {
        Some(description_path) if errors.is_empty() => Ok(Namespace {
            name: folder.name.clone(),
            description_path,
            events,
        }),
        _ => Err(errors),
    }
}

fn validate_event(folder: &EventFolder) -> Checked<Event> {
    let mut errors = Vec::new();

    if folder.versions.is_empty() {
        errors.push(ProjectError::NoEventVersions {
            path: folder.path.clone(),
        });
    }
    let description = require_description(&folder.description, &folder.path, &mut errors);
    let versions = collect(folder.versions.iter().map(validate_version), &mut errors);
    let transformations = collect(
        folder.transformations.iter().map(validate_transformation),
        &mut errors,
    );

    match description {
        Some(description_path) if errors.is_empty() => Ok(Event {
            event_type: folder.name.clone(),
            description_path,
            versions,
            transformations,
        }),
        _ => Err(errors),
    }
}

fn validate_version(folder: &VersionFolder) -> Checked<Version> {
    let mut errors = Vec::new();

    let number = parse_version(&folder.name);
    if number.is_none() {
        errors.push(ProjectError::WrongVersionFormat {
            path: folder.path.clone(),
        });
    }
    if folder.schema.is_none() {
        errors.push(ProjectError::NoSchema {
            path: folder.path.join(SCHEMA_FILE),
        });
    }
    let description = require_description(&folder.description, &folder.path, &mut errors);
    if folder.examples.is_empty() {
        errors.push(ProjectError::NoExamples {
            path: folder.path.clone(),
        });
    }

    match (number, &folder.schema, description) {
        (Some(version), Some(schema_path), Some(description_path)) if errors.is_empty() => {
            Ok(Version {
                version,
                schema_path: schema_path.clone(),
                description_path,
                examples: folder.examples.iter().map(|path| example(path)).collect(),
            })
        }
        _ => Err(errors),
    }
}

fn validate_transformation(folder: &TransformationFolder) -> Checked<Transformation> {
    let mut errors = Vec::new();

    let pair = parse_transformation(&folder.name);
    if pair.is_none() {
        errors.push(ProjectError::WrongVersionFormat {
            path: folder.path.clone(),
        });
    }
    if !folder.script.is_file() {
        errors.push(ProjectError::NoSuchFile {
            path: folder.script.clone(),
        });
    }

    match pair {
        Some((from, to)) if errors.is_empty() => Ok(Transformation {
            from,
            to,
            transformation_path: folder.script.clone(),
        }),
        _ => Err(errors),
    }
}

fn example(path: &Path) -> Example {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    Example {
        name,
        example_file_path: path.to_path_buf(),
    }
}

fn require_description(
    description: &Option<PathBuf>,
    folder: &Path,
    errors: &mut Vec<ProjectError>,
) -> Option<PathBuf> {
    if description.is_none() {
        errors.push(ProjectError::NoDescription {
            path: folder.to_path_buf(),
        });
    }
    description.clone()
}

/// Keep the successes, move every failure into `errors`
fn collect<T>(results: impl Iterator<Item = Checked<T>>, errors: &mut Vec<ProjectError>) -> Vec<T> {
    let mut values = Vec::new();
    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(mut errs) => errors.append(&mut errs),
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_folder(event: &Path, name: &str) -> VersionFolder {
        let path = event.join(name);
        VersionFolder {
            name: name.to_string(),
            schema: Some(path.join("schema.json")),
            description: Some(path.join("index.md")),
            examples: vec![path.join("examples/default.json")],
            path,
        }
    }

    fn project_folder() -> ProjectFolder {
        let root = PathBuf::from("/project");
        let ns = root.join("orders");
        let event = ns.join("OrderPlaced");
        ProjectFolder {
            description: Some(root.join("index.md")),
            namespaces: vec![NamespaceFolder {
                name: "orders".to_string(),
                description: Some(ns.join("index.md")),
                events: vec![EventFolder {
                    name: "OrderPlaced".to_string(),
                    description: Some(event.join("index.md")),
                    versions: vec![version_folder(&event, "1"), version_folder(&event, "2")],
                    transformations: Vec::new(),
                    path: event,
                }],
                path: ns,
            }],
            path: root,
        }
    }

    #[test]
    fn test_valid_structure() {
        let project = ProjectStructureValidationService::new()
            .validate_project_structure(&project_folder())
            .unwrap();

        assert_eq!(project.namespaces.len(), 1);
        let event = &project.namespaces[0].events[0];
        assert_eq!(event.event_type, "OrderPlaced");
        assert_eq!(event.versions[1].version, 2);
        assert_eq!(event.versions[0].examples[0].name, "default");
    }

    #[test]
    fn test_all_errors_are_collected() {
        let mut folder = project_folder();
        folder.description = None;
        let event = &mut folder.namespaces[0].events[0];
        event.versions[0].name = "one".to_string();
        event.versions[0].examples.clear();
        event.versions[1].schema = None;
        event.transformations.push(TransformationFolder {
            name: "1to2".to_string(),
            path: PathBuf::from("/project/orders/OrderPlaced/transformations/1to2"),
            script: PathBuf::from("/project/orders/OrderPlaced/transformations/1to2/transform.js"),
        });

        let errors = ProjectStructureValidationService::new()
            .validate_project_structure(&folder)
            .unwrap_err();

        assert_eq!(
            errors,
            vec![
                ProjectError::NoDescription {
                    path: PathBuf::from("/project")
                },
                ProjectError::WrongVersionFormat {
                    path: PathBuf::from("/project/orders/OrderPlaced/one")
                },
                ProjectError::NoExamples {
                    path: PathBuf::from("/project/orders/OrderPlaced/one")
                },
                ProjectError::NoSchema {
                    path: PathBuf::from("/project/orders/OrderPlaced/2/schema.json")
                },
                ProjectError::WrongVersionFormat {
                    path: PathBuf::from("/project/orders/OrderPlaced/transformations/1to2")
                },
                ProjectError::NoSuchFile {
                    path: PathBuf::from(
                        "/project/orders/OrderPlaced/transformations/1to2/transform.js"
                    )
                },
            ]
        );
    }

    #[test]
    fn test_empty_containers() {
        let mut folder = project_folder();
        folder.namespaces[0].events[0].versions.clear();
        folder.namespaces[0].description = None;

        let errors = ProjectStructureValidationService::new()
            .validate_project_structure(&folder)
            .unwrap_err();
        assert!(errors.contains(&ProjectError::NoEventVersions {
            path: PathBuf::from("/project/orders/OrderPlaced")
        }));
        assert!(errors.contains(&ProjectError::NoDescription {
            path: PathBuf::from("/project/orders")
        }));

        let empty = ProjectFolder {
            path: PathBuf::from("/empty"),
            description: Some(PathBuf::from("/empty/index.md")),
            namespaces: Vec::new(),
        };
        let errors = ProjectStructureValidationService::new()
            .validate_project_structure(&empty)
            .unwrap_err();
        assert_eq!(
            errors,
            vec![ProjectError::NoNamespaces {
                path: PathBuf::from("/empty")
            }]
        );
    }
}
