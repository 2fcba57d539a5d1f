//! CLI argument structs for all commands.

use clap::Parser;
use std::path::PathBuf;

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Directory holding the `NN-*.md` documents, relative to the current
    /// directory (default: docs)
    #[arg(short, long)]
    pub docs_dir: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `migrate` command
#[derive(Parser, Debug, Clone)]
pub struct MigrateArgs {
    /// Read documents from this directory instead of the configured one
    #[arg(short, long)]
    pub docs_dir: Option<PathBuf>,
}

/// Arguments for the `generate` command
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Write documents here instead of the configured docs directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the `export` command
#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// Write the catalog here instead of the configured path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `stats` command
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {}

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Check documents in this directory instead of the configured one
    #[arg(short, long)]
    pub docs_dir: Option<PathBuf>,
}
