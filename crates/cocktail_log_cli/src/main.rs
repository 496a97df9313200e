//! `cocktail-log` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, dispatch one command.
//! - Print the outcome notice and map it to the exit status.

mod cli;
mod config;
mod notify;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use cocktail_log_core::init_logging;
use config::AppConfig;
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli.global)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level.as_str(), log_dir)?;
    }

    let notice = cli::run(cli.command, &config)?;
    eprintln!("{notice}");
    Ok(if notice.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
