//! Implementation of the `init` command.
//!
//! Creates the `.gael/` directory with a configuration file and an empty
//! record store, and provides the lookup used by every other command to find
//! it again.

use crate::error::{ConfigError, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the gael directory
pub const GAEL_DIR_NAME: &str = ".gael";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the record store
pub const DATA_FILE_NAME: &str = "catalog.jsonl";

/// Name of the gitignore file within .gael
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Docs directory used when none is given
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// Catalog export path used when none is given
pub const DEFAULT_CATALOG_FILE: &str = "catalog.json";

/// Maximum directory depth to traverse when searching for the gael root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GaelConfig {
    /// Directory holding the `NN-*.md` documents, relative to the root
    #[serde(rename = "docs-dir")]
    pub docs_dir: String,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Catalog export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// `jsonl` for file-backed records, `memory` for a throwaway store
    pub backend: String,

    /// Path to the data file, relative to the root
    #[serde(rename = "data-file")]
    pub data_file: String,
}

/// Export configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportConfig {
    /// Where `gael export` writes the JSON catalog, relative to the root
    #[serde(rename = "catalog-file")]
    pub catalog_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            catalog_file: DEFAULT_CATALOG_FILE.to_string(),
        }
    }
}

impl StorageConfig {
    /// Resolve the configured backend against the repository root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownBackend` for anything but `jsonl` or
    /// `memory`.
    pub fn to_backend(&self, root_dir: &Path) -> Result<StorageBackend> {
        match self.backend.as_str() {
            "jsonl" => Ok(StorageBackend::Jsonl(root_dir.join(&self.data_file))),
            "memory" => Ok(StorageBackend::InMemory),
            other => Err(ConfigError::UnknownBackend(other.to_string()).into()),
        }
    }
}

impl GaelConfig {
    /// Create a configuration reading documents from `docs_dir`
    pub fn new(docs_dir: &str) -> Self {
        Self {
            docs_dir: docs_dir.to_string(),
            storage: StorageConfig {
                backend: "jsonl".to_string(),
                data_file: format!("{GAEL_DIR_NAME}/{DATA_FILE_NAME}"),
            },
            export: ExportConfig::default(),
        }
    }

    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Yaml(e.to_string()).into())
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Yaml(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for GaelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DOCS_DIR)
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created gael directory
    pub gael_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created data file
    pub data_file: PathBuf,
    /// Path to the created gitignore file
    pub gitignore_file: PathBuf,
    /// Docs directory recorded in the configuration
    pub docs_dir: String,
}

/// Initialize a new gael repository in the given directory.
///
/// # Errors
///
/// Returns an error if `.gael/` already exists or a file cannot be written.
pub async fn init(base_dir: &Path, docs_dir: Option<&str>) -> Result<InitResult> {
    let docs_dir = docs_dir
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .unwrap_or(DEFAULT_DOCS_DIR);

    let gael_dir = base_dir.join(GAEL_DIR_NAME);
    if gael_dir.exists() {
        return Err(ConfigError::AlreadyInitialized(gael_dir).into());
    }

    fs::create_dir_all(&gael_dir).await?;

    let config_file = gael_dir.join(CONFIG_FILE_NAME);
    let config = GaelConfig::new(docs_dir);
    config.save(&config_file).await?;

    let data_file = gael_dir.join(DATA_FILE_NAME);
    fs::write(&data_file, "").await?;

    let gitignore_file = gael_dir.join(GITIGNORE_FILE_NAME);
    fs::write(&gitignore_file, "# Left behind by interrupted saves\n*.tmp\n").await?;

    tracing::debug!(gael_dir = %gael_dir.display(), docs_dir, "initialized");

    Ok(InitResult {
        gael_dir,
        config_file,
        data_file,
        gitignore_file,
        docs_dir: docs_dir.to_string(),
    })
}

/// Find the gael root directory by searching up the directory tree.
///
/// Returns the directory containing `.gael/`, or `None` if there is none
/// within [`MAX_TRAVERSAL_DEPTH`] levels.
pub fn find_gael_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(GAEL_DIR_NAME).is_dir() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
