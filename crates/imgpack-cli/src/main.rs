//! imgpack CLI - Command-line utility for pulling training images out of
//! remotely hosted ZIP archives.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use imgpack_core::ReqwestClient;
use output::OutputFormatter;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(cli.command.name(), &err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &cli::Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let show_progress = !cli.quiet && !cli.json;

    match &cli.command {
        cli::Commands::Extract(args) => {
            let client = http_client()?;
            commands::extract::execute(args, &client, formatter, show_progress).await
        }
        cli::Commands::List(args) => {
            let client = http_client()?;
            commands::list::execute(args, &client, formatter, show_progress).await
        }
        cli::Commands::Normalize(args) => commands::normalize::execute(args, formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}

fn http_client() -> Result<ReqwestClient> {
    ReqwestClient::new().context("failed to initialize HTTP client")
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("warn,imgpack_core={level},imgpack={level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
