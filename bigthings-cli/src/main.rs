//! Entry point for the `bigthings` command-line interface.
#![forbid(unsafe_code)]

use bigthings_cli::CliError;

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match bigthings_cli::run() {
        Ok(()) => Ok(()),
        // Clap renders help, version and usage errors itself.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => Err(eyre::Report::new(err)),
    }
}
