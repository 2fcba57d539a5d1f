//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `init`: Create `.gael/` with a configuration and an empty record store
//! - `migrate`: Parse the docs directory into the record store
//! - `generate`: Write canonical documents from the record store
//! - `export`: Write the public JSON catalog
//! - `stats`: Show counts and the category tree
//! - `check`: Report documents that do not survive a parse/generate cycle
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! gael init --docs-dir docs
//! gael migrate
//! gael generate --output-dir /tmp/canonical
//! gael --json stats
//! ```

mod args;
mod execute;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{CheckArgs, ExportArgs, GenerateArgs, InitArgs, MigrateArgs, StatsArgs};

/// Gael - catalog markdown to JSONL records and back
///
/// Parses numbered catalog documents into `.gael/catalog.jsonl` and
/// regenerates them in canonical form.
#[derive(Parser, Debug)]
#[command(name = "gael")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new gael repository
    ///
    /// Creates the `.gael/` directory with configuration and an empty record
    /// store. Run this once next to your docs directory.
    Init(InitArgs),

    /// Parse the docs directory into the record store
    ///
    /// Replaces every stored record. Files that fail to read are skipped.
    Migrate(MigrateArgs),

    /// Write canonical documents from the record store
    ///
    /// Overwrites files of the same name in the output directory.
    Generate(GenerateArgs),

    /// Write the public JSON catalog
    Export(ExportArgs),

    /// Show catalog statistics
    ///
    /// Displays row counts and entries per document, section and subsection.
    Stats(StatsArgs),

    /// Check that documents survive a parse/generate cycle
    ///
    /// Exits non-zero if any document would change meaning when regenerated.
    Check(CheckArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown commands or malformed flags.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or, for `check`, if any
    /// document is unstable.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        let cwd = std::env::current_dir()?;

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(&cwd, args, output_mode).await,
            Some(Commands::Migrate(args)) => {
                let mut app = App::from_directory(&cwd).await?;
                execute::execute_migrate(&mut app, &cwd, args, output_mode).await
            }
            Some(Commands::Generate(args)) => {
                let app = App::from_directory(&cwd).await?;
                execute::execute_generate(&app, &cwd, args, output_mode).await
            }
            Some(Commands::Export(args)) => {
                let app = App::from_directory(&cwd).await?;
                execute::execute_export(&app, &cwd, args, output_mode).await
            }
            Some(Commands::Stats(args)) => {
                let app = App::from_directory(&cwd).await?;
                execute::execute_stats(&app, args, output_mode).await
            }
            Some(Commands::Check(args)) => execute::execute_check(&cwd, args, output_mode).await,
            None => {
                println!("Gael catalog tool");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}
