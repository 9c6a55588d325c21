//! cfgtree: configuration resolver
//!
//! Entry point for the cfgtree demo application.

use std::process::ExitCode;

use cfgtree::cli::{CliError, Runnable};

mod app;

use app::{exit_code, print_config_hint, setup_tracing, verbose_requested};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    setup_tracing(verbose_requested(&args));

    let mut command = app::command();
    let mut stdout = std::io::stdout().lock();

    match command.execute(&args, &mut stdout) {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Config(e)) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            exit_code::CONFIG_ERROR
        }
        Err(e @ CliError::UnknownCommand { .. }) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
        Err(e) => {
            tracing::error!("Application error: {e}");
            exit_code::runtime_error()
        }
    }
}
