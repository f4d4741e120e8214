// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gost-report — GOST laboratory report editor
//
// Entry point. Initialises logging and app services, then dispatches the
// parsed command.

mod cli;
mod commands;
mod services;

use std::process::ExitCode;

use clap::Parser;
use gost_report_core::human_errors::humanize_error;

use cli::Cli;
use commands::CommandError;
use services::app_services::AppServices;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let services = AppServices::init(cli.config.as_deref());

    match commands::run(cli.command, &services).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Export(err)) => {
            tracing::error!(error = %err, "export failed");
            let human = humanize_error(&err);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
