mod cli;
mod commands;
mod error;
mod output;
mod sim;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use datausage_api::DataUsageClient;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // The demo always runs against the simulated platform bridge; a real
    // deployment would attach the OS module here instead.
    let client = DataUsageClient::new(Arc::new(sim::SimulatedBridge));

    tracing::debug!(command = ?cli.command, "dispatching command");
    match cli.command {
        Command::Status => commands::status::handle(&client, &cli.global).await,
        Command::Usage(args) => commands::usage::handle(&client, args, &cli.global).await,
        Command::Watch(args) => {
            let feed_cancel = CancellationToken::new();
            let native_rx = sim::spawn_event_feed(Duration::from_millis(500), feed_cancel.clone());
            let result = commands::watch::handle(&client, native_rx, args, &cli.global).await;
            feed_cancel.cancel();
            result
        }
        Command::Permissions => commands::permissions::handle(&client, &cli.global).await,
    }
}
