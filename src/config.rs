//! Configuration management for the registry tool
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (event-schemas.toml)
//! - Environment variables (EVENT_SCHEMAS__*)
//!
//! ## Example config file (event-schemas.toml):
//! ```toml
//! [transform]
//! runtime = "node"
//! function = "transform"
//! script_file = "transform.js"
//!
//! [index]
//! checksum = "md5"
//! output_format = "pretty"
//! file_name = "index.json"
//!
//! [project]
//! skip_hidden = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::checksum::ChecksumAlgorithm;

/// Main configuration for the registry tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Transformation script execution
    #[serde(default)]
    pub transform: TransformConfig,

    /// Index and distribution output
    #[serde(default)]
    pub index: IndexConfig,

    /// Project folder reading
    #[serde(default)]
    pub project: ProjectConfig,
}

/// How transformation scripts are run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// JavaScript runtime binary
    #[serde(default = "default_runtime")]
    pub runtime: PathBuf,

    /// Function every script must define
    #[serde(default = "default_function")]
    pub function: String,

    /// Script file name inside a transformation folder
    #[serde(default = "default_script_file")]
    pub script_file: String,
}

/// Index output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub checksum: ChecksumAlgorithm,

    #[serde(default)]
    pub output_format: OutputFormat,

    /// Index file name at the distribution root
    #[serde(default = "default_index_file")]
    pub file_name: String,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl OutputFormat {
    pub fn render<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

/// Folder reading settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Ignore directories starting with '.'
    #[serde(default = "default_true")]
    pub skip_hidden: bool,
}

fn default_runtime() -> PathBuf {
    PathBuf::from("node")
}

fn default_function() -> String {
    "transform".to_string()
}

fn default_script_file() -> String {
    "transform.js".to_string()
}

fn default_index_file() -> String {
    "index.json".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            function: default_function(),
            script_file: default_script_file(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            checksum: ChecksumAlgorithm::default(),
            output_format: OutputFormat::default(),
            file_name: default_index_file(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { skip_hidden: true }
    }
}

impl RegistryConfig {
    /// Load configuration, with an optional file that must exist
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "event-schemas.toml",
            ".event-schemas.toml",
            "config/event-schemas.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "event-schemas", "event-schemas") {
            let user_config = config_dir.config_dir().join("event-schemas.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("EVENT_SCHEMAS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
