use std::process::ExitCode;

use clap::Parser;
use expense_tracker::LedgerError;
use expense_tracker::cli::Cli;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    debug!("Log level set to {}", cli.log_level.to_string().to_lowercase());
    trace!("{cli:?}");

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            exit_code(&e)
        }
    }
}

/// Invalid input exits with 2, like a usage error; everything else with 1.
fn exit_code(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<LedgerError>() {
        Some(e) if e.is_validation() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use the requested level for this crate only.
            EnvFilter::new(format!(
                "expense_tracker={},{}={}",
                level,
                env!("CARGO_CRATE_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
