//! appcast-notify CLI entry point
//!
//! Parses arguments, sets up logging on stderr and runs the selected command.
//! Errors are printed with context and suggestions and exit with status 1.

use anyhow::Result;
use appcast_notify::cli;
use appcast_notify::core::error::user_friendly_error;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Logs go to stderr so stdout stays clean for prompts and JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(cli.log_filter())
                .unwrap_or_else(|_| EnvFilter::new(cli::DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
