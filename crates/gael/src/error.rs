//! Error types for gael operations.

use gael_markdown::IntegrityError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for gael operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Problems locating or reading the `.gael/` configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.gael/` directory in the working directory or any parent.
    #[error("Not a gael repository (or any parent up to the filesystem root). Run 'gael init' first.")]
    NotInitialized,

    /// `gael init` found an existing `.gael/` directory.
    #[error("Gael is already initialized in this directory. Found existing '{}'", .0.display())]
    AlreadyInitialized(PathBuf),

    /// The configuration file could not be parsed or written.
    #[error("Invalid configuration: {0}")]
    Yaml(String),

    /// `storage.backend` names a backend that does not exist.
    #[error("Unknown storage backend '{0}' (expected 'jsonl' or 'memory')")]
    UnknownBackend(String),

    /// The docs directory does not exist.
    #[error("Docs directory not found: {}", .0.display())]
    DocsDirMissing(PathBuf),
}

/// Storage-layer errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A row could not be serialized for writing.
    #[error("Failed to serialize row: {0}")]
    Serialization(serde_json::Error),

    /// The record set handed to storage is inconsistent.
    #[error("Record set failed integrity check: {0}")]
    Integrity(#[from] IntegrityError),
}

/// A specialized Result type for gael operations.
pub type Result<T> = std::result::Result<T, Error>;
