//! `yuntas`: terminal front end for the Yuntas Publicidad admin API.

use std::process::ExitCode;

use clap::Parser;
use utils::logging::{self, LogSettings};

mod app;
mod args;
mod commands;
mod config;
mod output;

use app::App;
use args::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let _log_guards = logging::init(&LogSettings::from_env(logging::default_log_dir(), cli.verbose));

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let app = App::from_cli(&cli)?;
    tracing::debug!(base_url = %app.config.api.base_url, "configuration loaded");
    commands::run(&app, cli.command).await
}
