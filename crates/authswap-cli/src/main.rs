//! CLI entry point for authswap.
//!
//! This binary provides the `authswap` command: one-shot execution of a
//! single verb, or a line-oriented mode (`--stdin`) for hosts that forward
//! their command lines to it.

mod cli;
mod helpers;
mod terminal;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use authswap_command::{Config, Dispatcher, Outcome};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::helpers::{command_line, init_tracing};
use crate::terminal::TerminalHost;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();
    init_tracing("warn");

    let config = Config::from_env().context("failed to resolve configuration")?;
    let dispatcher = Dispatcher::new(&config, Arc::new(TerminalHost::new()));

    if cli.stdin {
        run_stdin(&dispatcher).await
    } else {
        Ok(run_once(&dispatcher, &cli.command).await)
    }
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// Execute the single command given on the command line.
async fn run_once(dispatcher: &Dispatcher, words: &[String]) -> ExitCode {
    let line = command_line(dispatcher.keyword(), words);
    match dispatcher.execute(&line).await {
        Outcome::Failed => ExitCode::FAILURE,
        Outcome::Completed | Outcome::Ignored => ExitCode::SUCCESS,
    }
}

/// Execute every command line read from stdin until EOF.
async fn run_stdin(dispatcher: &Dispatcher) -> Result<ExitCode> {
    info!(keyword = dispatcher.keyword(), "reading commands from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let outcome = dispatcher.execute(trimmed).await;
        debug!(?outcome, "command line processed");
    }

    info!("stdin closed");
    Ok(ExitCode::SUCCESS)
}
