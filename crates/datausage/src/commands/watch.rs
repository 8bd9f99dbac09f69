//! `datausage watch` -- stream native change events to the terminal.

use std::time::Duration;

use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use datausage_api::{DataUsageClient, DataUsageEvent};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

const EVENT_WAIT: Duration = Duration::from_secs(30);

/// Subscribe to both event classes, print `args.count` deliveries, then
/// tear everything down.
pub async fn handle(
    client: &DataUsageClient,
    native_rx: mpsc::Receiver<DataUsageEvent>,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cancel = CancellationToken::new();
    let pump = client.attach_event_stream(native_rx, cancel.clone());

    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
    let usage_tx = seen_tx.clone();
    let connection_sub = client.on_connection_change(move |event| {
        let _ = seen_tx.send(event.clone());
    });
    let usage_sub = client.on_usage_change(move |event| {
        let _ = usage_tx.send(event.clone());
    });

    let result = print_events(&mut seen_rx, args.count, global).await;

    connection_sub.remove();
    usage_sub.remove();
    pump.shutdown();
    cancel.cancel();

    result
}

async fn print_events(
    seen_rx: &mut mpsc::UnboundedReceiver<DataUsageEvent>,
    count: u32,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    for _ in 0..count {
        let event = tokio::time::timeout(EVENT_WAIT, seen_rx.recv())
            .await
            .map_err(|_| CliError::WatchTimeout {
                seconds: EVENT_WAIT.as_secs(),
            })?
            .ok_or(CliError::WatchTimeout {
                seconds: EVENT_WAIT.as_secs(),
            })?;

        let out = output::render_single(global.output, &event, format_event, |e| match e {
            DataUsageEvent::ConnectionChange { is_connected } => {
                format!("connectionChange {is_connected}")
            }
            DataUsageEvent::UsageChange { event_name, .. } => {
                format!("usageChange {event_name}")
            }
        });
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

fn format_event(event: &DataUsageEvent) -> String {
    match event {
        DataUsageEvent::ConnectionChange { is_connected } => format!(
            "{}  connected={}",
            "connectionChange".cyan(),
            if *is_connected {
                "true".green().to_string()
            } else {
                "false".red().to_string()
            }
        ),
        DataUsageEvent::UsageChange {
            network_type,
            event_name,
        } => format!(
            "{}  networkType={network_type} event={event_name}",
            "usageChange".magenta(),
        ),
    }
}
