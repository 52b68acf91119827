//! hostblock CLI
//!
//! Writes the hosts of one inventory group into a tagged block of a hosts file.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    println!(
        "{} {}",
        "hostblock".green().bold(),
        env!("CARGO_PKG_VERSION")
    );
    tracing::debug!("Verbose mode enabled");

    commands::run_sync(&cli)
}

/// Log to stderr. `RUST_LOG` is honored unless `--verbose` forces debug.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}
