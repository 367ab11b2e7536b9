mod cli;
mod error;

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use quire_config::{Config, Overrides};
use quire_library::Library;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

/// Logs go to stderr so stdout only carries command output. `RUST_LOG` is
/// honoured unless `-v` asks for something specific.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides { root: cli.root };
    let config = Config::load(cli.config.as_deref(), overrides).or_raise(|| ErrorKind::Config)?;
    let mut library = Library::open(&config.root).or_raise(|| ErrorKind::Open(config.root.clone()))?;
    tracing::debug!(command = ?cli.command, "Running command");
    cli.command.run(&mut library, &mut std::io::stdout().lock())
}
