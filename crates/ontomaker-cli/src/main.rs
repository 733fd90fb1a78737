mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use ontomaker_core::MakerError;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let operation = cli.command.operation();
    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(operation, &err);
            ExitCode::FAILURE
        }
    }
}

/// Compiler failures go to stderr as a JSON payload; anything else as plain text.
fn report_error(operation: &str, err: &anyhow::Error) {
    if let Some(maker_error) = err.downcast_ref::<MakerError>() {
        match serde_json::to_string(&maker_error.to_payload(operation)) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!("{maker_error}"),
        }
    } else {
        eprintln!("error: {err:#}");
    }
}
