//! Command-line interface for browsing and contributing to the Big Things
//! catalog.
#![forbid(unsafe_code)]

use std::io::{self, Write};

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;
mod fs;

use commands::{
    CommonArgs, DefaultSessionFactory, ListArgs, RateArgs, RecordArgs, SessionFactory, SubmitArgs,
};
pub use error::CliError;

/// Run the Big Things CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when argument parsing, configuration, or the
/// selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    run_with(cli.command, &DefaultSessionFactory, &mut handle)
}

fn run_with<F: SessionFactory>(
    command: Command,
    factory: &F,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::List(args) => commands::list(args, factory, writer),
        Command::Show(args) => commands::show(args, factory, writer),
        Command::Favorite(args) => commands::favorite(args, factory, writer),
        Command::Favorites(args) => commands::favorites(args, factory, writer),
        Command::Rate(args) => commands::rate(args, factory, writer),
        Command::Submit(args) => commands::submit(args, factory, writer),
        Command::Reset(args) => commands::reset(args, factory, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "bigthings",
    about = "Browse, rate and submit Big Things from the community catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List catalog records, optionally filtered and sorted.
    List(ListArgs),
    /// Download and print the detail records for one identifier.
    Show(RecordArgs),
    /// Mark a record as a favorite in the local cache.
    Favorite(RecordArgs),
    /// List locally stored favorites.
    Favorites(CommonArgs),
    /// Rate a record once, locally and on the catalog.
    Rate(RateArgs),
    /// Submit a new Big Thing to the catalog.
    Submit(SubmitArgs),
    /// Clear every favorite and rating from the local cache.
    Reset(CommonArgs),
}

#[cfg(test)]
mod tests;
