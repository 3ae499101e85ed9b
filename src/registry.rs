//! Registry Distribution
//!
//! Writes the distributable registry directory: every schema and
//! transformation script at the path named by its index id, plus the index
//! file at the root.
//!
//! ```text
//! dist/
//! ├── index.json
//! └── orders/
//!     └── OrderPlaced/
//!         ├── 1/schema.json
//!         ├── 2/schema.json
//!         └── 1-2/transform.js
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::IndexConfig;
use crate::error::Result;
use crate::index::{schema_id, transformation_id, Index};
use crate::model::Project;

pub struct Distribution {
    root: PathBuf,
}

impl Distribution {
    /// Replace `output` with a fresh distribution of `project`
    pub fn create(
        project: &Project,
        index: &Index,
        output: impl AsRef<Path>,
        config: &IndexConfig,
    ) -> Result<Self> {
        let root = output.as_ref().to_path_buf();

        if root.exists() {
            tracing::info!(path = %root.display(), "removing previous distribution");
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;

        for (namespace, event, version) in project.event_versions() {
            let id = schema_id(&namespace.name, &event.event_type, version.version);
            copy_to(&version.schema_path, &root.join(id))?;
        }

        for (namespace, event, transformation) in project.event_transformations() {
            let id = transformation_id(
                &namespace.name,
                &event.event_type,
                transformation.from,
                transformation.to,
            );
            copy_to(transformation.path(), &root.join(id))?;
        }

        let index_path = root.join(&config.file_name);
        fs::write(&index_path, config.output_format.render(index)?)?;
        tracing::info!(path = %index_path.display(), "index written");

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self, config: &IndexConfig) -> PathBuf {
        self.root.join(&config.file_name)
    }
}

fn copy_to(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)?;
    Ok(())
}
