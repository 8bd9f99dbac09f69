//! `datausage status` -- connectivity state and active network type.

use owo_colors::OwoColorize;
use serde::Serialize;

use datausage_api::{DataUsageClient, Error, NetworkType};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusReport {
    connected: bool,
    network_type: Option<NetworkType>,
}

pub async fn handle(client: &DataUsageClient, global: &GlobalOpts) -> Result<(), CliError> {
    let connected = client.is_connected().await?;

    // An unknown type code renders as "unknown" instead of aborting,
    // matching how consumers display this state.
    let network_type = match client.network_type().await {
        Ok(network) => Some(network),
        Err(Error::UnknownNetworkType { code }) => {
            tracing::warn!(code, "native layer reported an unknown network type");
            None
        }
        Err(err) => return Err(err.into()),
    };

    let report = StatusReport {
        connected,
        network_type,
    };

    let out = output::render_single(
        global.output,
        &report,
        |r| {
            let network = r
                .network_type
                .map_or_else(|| "unknown".to_string(), |n| n.to_string());
            format!(
                "Connected: {}\nNetwork:   {}",
                if r.connected {
                    "yes".green().to_string()
                } else {
                    "no".red().to_string()
                },
                network.cyan(),
            )
        },
        |r| {
            r.network_type
                .map_or_else(|| "unknown".to_string(), |n| n.to_string())
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
