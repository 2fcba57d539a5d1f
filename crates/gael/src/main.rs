//! Gael CLI binary.

use anyhow::Result;
use gael::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the gael CLI.
///
/// Uses tokio's `current_thread` runtime; every command is sequential file I/O.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Example: RUST_LOG=gael=debug,gael_markdown=trace gael migrate
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gael=info,gael_markdown=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting gael CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Gael CLI completed successfully");
    Ok(())
}
