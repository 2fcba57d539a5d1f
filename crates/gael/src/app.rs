//! Application context for CLI command execution.
//!
//! [`App`] locates the `.gael/` directory, loads its configuration and opens
//! the configured storage, so commands receive everything through one value.
//!
//! # Example
//!
//! ```no_run
//! use gael::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     println!("{} entries", app.storage().stats().await?.entries);
//!     Ok(())
//! }
//! ```

use crate::commands::init::{CONFIG_FILE_NAME, GAEL_DIR_NAME, GaelConfig, find_gael_root};
use crate::error::{ConfigError, Result};
use crate::storage::{CatalogStorage, create_storage};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
pub struct App {
    /// The storage backend
    storage: Box<dyn CatalogStorage>,

    /// Directory containing `.gael/`
    root_dir: PathBuf,

    /// Path to the gael directory (.gael)
    gael_dir: PathBuf,

    /// Loaded configuration
    config: GaelConfig,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("root_dir", &self.root_dir)
            .field("gael_dir", &self.gael_dir)
            .field("config", &self.config)
            .field("storage", &"<dyn CatalogStorage>")
            .finish()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree for `.gael/`, loads the configuration
    /// and opens storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No gael repository is found in the directory tree
    /// - Configuration cannot be loaded or names an unknown backend
    /// - The data file exists but cannot be read
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_gael_root(working_dir).ok_or(ConfigError::NotInitialized)?;

        let gael_dir = root_dir.join(GAEL_DIR_NAME);
        let config = GaelConfig::load(&gael_dir.join(CONFIG_FILE_NAME)).await?;

        let backend = config.storage.to_backend(&root_dir)?;
        let storage = create_storage(backend).await?;

        tracing::debug!(root = %root_dir.display(), backend = %config.storage.backend, "opened app");

        Ok(Self {
            storage,
            root_dir,
            gael_dir,
            config,
        })
    }

    /// Get a mutable reference to the storage.
    pub fn storage_mut(&mut self) -> &mut dyn CatalogStorage {
        self.storage.as_mut()
    }

    /// Get an immutable reference to the storage.
    pub fn storage(&self) -> &dyn CatalogStorage {
        self.storage.as_ref()
    }

    /// Directory containing `.gael/`.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Path to the gael directory.
    pub fn gael_dir(&self) -> &Path {
        &self.gael_dir
    }

    /// Loaded configuration.
    pub fn config(&self) -> &GaelConfig {
        &self.config
    }

    /// Configured docs directory, resolved against the root.
    pub fn docs_dir(&self) -> PathBuf {
        self.root_dir.join(&self.config.docs_dir)
    }

    /// Configured catalog export path, resolved against the root.
    pub fn catalog_path(&self) -> PathBuf {
        self.root_dir.join(&self.config.export.catalog_file)
    }

    /// Resolve a user-supplied path: absolute paths are kept, relative
    /// ones are taken from `cwd`.
    pub fn resolve(cwd: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        }
    }

    /// Save storage state to persistent storage.
    pub async fn save(&self) -> Result<()> {
        self.storage.save().await
    }
}
