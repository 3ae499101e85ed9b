//! Project Folder Loading
//!
//! Reads a registry project from disk into raw folder records. Nothing is
//! validated here: missing files show up as `None`, and structure validation
//! decides what that means.
//!
//! ```text
//! project/
//! ├── index.md
//! └── orders/                      namespace
//!     ├── index.md
//!     └── OrderPlaced/             event type
//!         ├── index.md
//!         ├── 1/
//!         │   ├── index.md
//!         │   ├── schema.json
//!         │   └── examples/*.json
//!         ├── 2/
//!         └── transformations/
//!             ├── 1-2/transform.js
//!             └── 2-1/transform.js
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::config::ProjectConfig;
use crate::error::{ProjectError, RegistryError, Result};

pub const DESCRIPTION_FILE: &str = "index.md";
pub const SCHEMA_FILE: &str = "schema.json";
pub const EXAMPLES_DIR: &str = "examples";
pub const TRANSFORMATIONS_DIR: &str = "transformations";

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFolder {
    pub path: PathBuf,
    pub description: Option<PathBuf>,
    pub namespaces: Vec<NamespaceFolder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceFolder {
    pub name: String,
    pub path: PathBuf,
    pub description: Option<PathBuf>,
    pub events: Vec<EventFolder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventFolder {
    pub name: String,
    pub path: PathBuf,
    pub description: Option<PathBuf>,
    pub versions: Vec<VersionFolder>,
    pub transformations: Vec<TransformationFolder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VersionFolder {
    pub name: String,
    pub path: PathBuf,
    pub schema: Option<PathBuf>,
    pub description: Option<PathBuf>,
    pub examples: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformationFolder {
    pub name: String,
    pub path: PathBuf,
    /// Expected location of the script, whether or not it exists
    pub script: PathBuf,
}

/// Read a JSON document, reporting any failure as `NoSuchFile`
pub fn read_json(path: &Path) -> std::result::Result<Value, ProjectError> {
    let no_such_file = || ProjectError::NoSuchFile {
        path: path.to_path_buf(),
    };
    let content = fs::read_to_string(path).map_err(|_| no_such_file())?;
    serde_json::from_str(&content).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "invalid JSON");
        no_such_file()
    })
}

/// Read the folder tree rooted at `root`
pub fn read_project_folder(
    root: &Path,
    config: &ProjectConfig,
    script_file: &str,
) -> Result<ProjectFolder> {
    if !root.is_dir() {
        return Err(RegistryError::InvalidProjectPath(root.to_path_buf()));
    }

    let mut namespaces = Vec::new();
    for (name, path) in child_dirs(root, config)? {
        namespaces.push(read_namespace(name, path, config, script_file)?);
    }

    Ok(ProjectFolder {
        path: root.to_path_buf(),
        description: existing_file(root.join(DESCRIPTION_FILE)),
        namespaces,
    })
}

fn read_namespace(
    name: String,
    path: PathBuf,
    config: &ProjectConfig,
    script_file: &str,
) -> Result<NamespaceFolder> {
    let mut events = Vec::new();
    for (event_name, event_path) in child_dirs(&path, config)? {
        events.push(read_event(event_name, event_path, config, script_file)?);
    }

    Ok(NamespaceFolder {
        name,
        description: existing_file(path.join(DESCRIPTION_FILE)),
        path,
        events,
    })
}

fn read_event(
    name: String,
    path: PathBuf,
    config: &ProjectConfig,
    script_file: &str,
) -> Result<EventFolder> {
    let mut versions = Vec::new();
    let mut transformations = Vec::new();

    for (child_name, child_path) in child_dirs(&path, config)? {
        if child_name == TRANSFORMATIONS_DIR {
            for (t_name, t_path) in child_dirs(&child_path, config)? {
                transformations.push(TransformationFolder {
                    name: t_name,
                    script: t_path.join(script_file),
                    path: t_path,
                });
            }
        } else {
            versions.push(read_version(child_name, child_path)?);
        }
    }

    Ok(EventFolder {
        name,
        description: existing_file(path.join(DESCRIPTION_FILE)),
        path,
        versions,
        transformations,
    })
}

fn read_version(name: String, path: PathBuf) -> Result<VersionFolder> {
    let examples_dir = path.join(EXAMPLES_DIR);
    let mut examples = Vec::new();
    if examples_dir.is_dir() {
        for entry in WalkDir::new(&examples_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let is_json = entry.path().extension().map(|ext| ext == "json").unwrap_or(false);
            if entry.file_type().is_file() && is_json {
                examples.push(entry.into_path());
            }
        }
    }

    Ok(VersionFolder {
        name,
        schema: existing_file(path.join(SCHEMA_FILE)),
        description: existing_file(path.join(DESCRIPTION_FILE)),
        path,
        examples,
    })
}

/// Immediate subdirectories of `dir`, sorted by name
fn child_dirs(dir: &Path, config: &ProjectConfig) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if config.skip_hidden && name.starts_with('.') {
            continue;
        }
        dirs.push((name, entry.into_path()));
    }
    Ok(dirs)
}

fn existing_file(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("example.json");
        fs::write(&path, r#"{"id": 1}"#).unwrap();
        assert_eq!(read_json(&path).unwrap(), serde_json::json!({"id": 1}));

        fs::write(&path, "{").unwrap();
        assert_eq!(read_json(&path).unwrap_err(), ProjectError::NoSuchFile { path: path.clone() });
    }

    #[test]
    fn test_invalid_project_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = read_project_folder(&missing, &ProjectConfig::default(), "transform.js");
        assert!(matches!(result, Err(RegistryError::InvalidProjectPath(_))));
    }

    #[test]
    fn test_read_tree() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let version = root.join("orders/OrderPlaced/1");
        fs::create_dir_all(version.join("examples")).unwrap();
        fs::create_dir_all(root.join("orders/OrderPlaced/transformations/1-2")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("index.md"), "# Project").unwrap();
        fs::write(version.join("schema.json"), "{}").unwrap();
        fs::write(version.join("examples/b.json"), "{}").unwrap();
        fs::write(version.join("examples/a.json"), "{}").unwrap();
        fs::write(version.join("examples/notes.txt"), "").unwrap();

        let folder = read_project_folder(root, &ProjectConfig::default(), "transform.js").unwrap();
        assert!(folder.description.is_some());
        assert_eq!(folder.namespaces.len(), 1);

        let namespace = &folder.namespaces[0];
        assert_eq!(namespace.name, "orders");
        assert!(namespace.description.is_none());

        let event = &namespace.events[0];
        assert_eq!(event.name, "OrderPlaced");
        assert_eq!(event.versions.len(), 1);
        assert_eq!(event.transformations.len(), 1);
        assert_eq!(event.transformations[0].name, "1-2");

        let v1 = &event.versions[0];
        assert!(v1.schema.is_some());
        assert!(v1.description.is_none());
        let names: Vec<_> = v1
            .examples
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }
}
