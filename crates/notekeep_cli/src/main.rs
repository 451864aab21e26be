//! `notekeep` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from environment and flags.
//! - Start logging, open the configured backend, run one subcommand.

mod cli;
mod commands;
mod render;

use clap::Parser;
use cli::Cli;
use notekeep_core::init_logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("notekeep: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(config.log_level, config.log_target()) {
        eprintln!("notekeep: {err}");
        return ExitCode::FAILURE;
    }

    match commands::run(&config, cli.command) {
        Ok(status) => status.into(),
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("notekeep: {err}");
            ExitCode::FAILURE
        }
    }
}
