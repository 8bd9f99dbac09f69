//! `datausage permissions` -- request the usage-stats capability.

use owo_colors::OwoColorize;
use serde::Serialize;

use datausage_api::{DataUsageClient, READ_PHONE_STATE};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct PermissionReport {
    capability: &'static str,
    granted: bool,
}

pub async fn handle(client: &DataUsageClient, global: &GlobalOpts) -> Result<(), CliError> {
    let granted = client.request_permissions().await?;

    let report = PermissionReport {
        capability: READ_PHONE_STATE,
        granted,
    };

    let out = output::render_single(
        global.output,
        &report,
        |r| {
            format!(
                "{}: {}",
                r.capability,
                if r.granted {
                    "granted".green().to_string()
                } else {
                    "not granted".red().to_string()
                }
            )
        },
        |r| r.granted.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
