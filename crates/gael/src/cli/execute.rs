//! Command execution logic.
//!
//! Each function runs one command through [`crate::commands`] and renders
//! the result in the requested [`OutputMode`].

use anyhow::Result;
use std::path::Path;

use super::args::{CheckArgs, ExportArgs, GenerateArgs, InitArgs, MigrateArgs, StatsArgs};
use crate::app::App;
use crate::output::{self, OutputConfig, OutputMode};

/// Execute the init command
pub async fn execute_init(cwd: &Path, args: &InitArgs, output_mode: OutputMode) -> Result<()> {
    use crate::commands::init;

    let result = init::init(cwd, args.docs_dir.as_deref()).await?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "gael_dir": result.gael_dir.display().to_string(),
            "config_file": result.config_file.display().to_string(),
            "data_file": result.data_file.display().to_string(),
            "docs_dir": result.docs_dir,
        }))?,
        OutputMode::Text if !args.quiet => {
            let config = OutputConfig::from_env();
            println!(
                "{} gael in {}",
                output::success("Initialized", &config),
                result.gael_dir.display()
            );
            println!("  Config: {}", result.config_file.display());
            println!("  Data:   {}", result.data_file.display());
            println!("  Docs:   {}", result.docs_dir);
        }
        OutputMode::Text => {}
    }

    Ok(())
}

/// Execute the migrate command
pub async fn execute_migrate(
    app: &mut App,
    cwd: &Path,
    args: &MigrateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::commands::migrate;

    let docs_dir = args
        .docs_dir
        .as_deref()
        .map_or_else(|| app.docs_dir(), |dir| App::resolve(cwd, dir));

    let summary = migrate::migrate(app.storage_mut(), &docs_dir).await?;

    match output_mode {
        OutputMode::Json => output::print_json(&summary)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!("Migrating docs from {}", docs_dir.display());
            for file in &summary.files {
                println!(
                    "  {} {} ({} entries)",
                    output::info(&format!("{:02}", file.doc_number), &config),
                    file.filename,
                    file.entries
                );
                for warning in &file.warnings {
                    println!("      {}", output::warning(warning, &config));
                }
            }
            for path in &summary.skipped {
                println!(
                    "  {} {}",
                    output::warning("skipped", &config),
                    path.display()
                );
            }
            println!(
                "{} {} documents with {} entries",
                output::success("Migrated", &config),
                summary.documents,
                summary.entries
            );
        }
    }

    Ok(())
}

/// Execute the generate command
pub async fn execute_generate(
    app: &App,
    cwd: &Path,
    args: &GenerateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::commands::generate;

    let output_dir = args
        .output_dir
        .as_deref()
        .map_or_else(|| app.docs_dir(), |dir| App::resolve(cwd, dir));

    let summary = generate::generate(app.storage(), &output_dir).await?;

    match output_mode {
        OutputMode::Json => output::print_json(&summary)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            for file in &summary.files {
                println!("  wrote {}", file.path.display());
            }
            for filename in &summary.skipped {
                println!("  {} {filename}", output::warning("skipped", &config));
            }
            println!(
                "{} {} documents in {}",
                output::success("Generated", &config),
                summary.files.len(),
                output_dir.display()
            );
        }
    }

    Ok(())
}

/// Execute the export command
pub async fn execute_export(
    app: &App,
    cwd: &Path,
    args: &ExportArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::export;

    let path = args
        .output
        .as_deref()
        .map_or_else(|| app.catalog_path(), |p| App::resolve(cwd, p));

    let records = app.storage().records().await?;
    let catalog = export::build_catalog(&records);
    export::write_catalog(&catalog, &path).await?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "total_entries": catalog.total_entries,
            "categories": catalog.categories.len(),
        }))?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!(
                "{} {} entries in {} categories to {}",
                output::success("Exported", &config),
                catalog.total_entries,
                catalog.categories.len(),
                path.display()
            );
        }
    }

    Ok(())
}

/// Execute the stats command
pub async fn execute_stats(app: &App, _args: &StatsArgs, output_mode: OutputMode) -> Result<()> {
    let stats = app.storage().stats().await?;
    output::print_category_tree(&stats, output_mode)?;
    Ok(())
}

/// Execute the check command
///
/// Works without `.gael/` when `--docs-dir` is given.
pub async fn execute_check(cwd: &Path, args: &CheckArgs, output_mode: OutputMode) -> Result<()> {
    use crate::commands::check;
    use crate::loader;

    let docs_dir = match args.docs_dir.as_deref() {
        Some(dir) => App::resolve(cwd, dir),
        None => App::from_directory(cwd).await?.docs_dir(),
    };

    let loaded = loader::load_docs(&docs_dir).await?;
    let report = check::check_files(&loaded.files);

    match output_mode {
        OutputMode::Json => output::print_json(&report)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            for file in &report.files {
                println!(
                    "{} {} ({} entries)",
                    output::color::status_icon(file.is_stable(), &config),
                    file.filename,
                    file.entries
                );
                for problem in &file.problems {
                    println!("    {}", output::error(problem, &config));
                }
            }
        }
    }

    let unstable = report.unstable().count();
    if unstable > 0 {
        anyhow::bail!(
            "{unstable} of {} documents do not round-trip",
            report.files.len()
        );
    }
    Ok(())
}
