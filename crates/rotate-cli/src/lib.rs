//! rotate-backups CLI library.
//!
//! Parses command-line options and configuration files, resolves them into
//! one rotation job per location and renders the resulting reports.

pub mod cli;
pub mod config;
pub mod error;
pub mod expression;
pub mod logging;
pub mod output;
pub mod rotation;

pub use cli::{Cli, CliFormat};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use rotation::{build_jobs, execute, RunOutcome};

/// Rotate, print the reports to stdout and return whether the run was clean.
pub async fn run(cli: &Cli) -> Result<bool> {
    let outcome = execute(cli).await?;
    let formatter = Formatter::new(cli.format, !cli.no_color);
    println!("{}", formatter.format_run(&outcome.reports, &outcome.metrics)?);
    Ok(outcome.is_success())
}
