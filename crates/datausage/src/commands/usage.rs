//! `datausage usage` -- byte counters over a time range.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use datausage_api::{DataUsageClient, NetworkType, UsageBreakdown};

use crate::cli::{GlobalOpts, UsageArgs};
use crate::error::CliError;
use crate::output;

/// One hour, the default query window.
const DEFAULT_WINDOW_MS: i64 = 3_600_000;

#[derive(Debug, Serialize, Tabled)]
struct UsageRow {
    scope: String,
    bytes: u64,
    kb: f64,
    mb: f64,
    gb: f64,
}

/// Accept Unix milliseconds or an RFC3339 timestamp.
fn parse_time(value: &str, field: &str) -> Result<i64, CliError> {
    if let Ok(ms) = value.parse::<i64>() {
        return Ok(ms);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).timestamp_millis())
        .map_err(|_| CliError::Validation {
            field: field.into(),
            reason: format!("invalid timestamp '{value}' (use Unix millis or RFC3339)"),
        })
}

fn resolve_range(args: &UsageArgs) -> Result<(i64, i64), CliError> {
    let end_ms = match args.end.as_deref() {
        Some(value) => parse_time(value, "end")?,
        None => Utc::now().timestamp_millis(),
    };
    let start_ms = match args.start.as_deref() {
        Some(value) => parse_time(value, "start")?,
        None => end_ms - DEFAULT_WINDOW_MS,
    };
    Ok((start_ms, end_ms))
}

pub async fn handle(
    client: &DataUsageClient,
    args: UsageArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (start_ms, end_ms) = resolve_range(&args)?;
    let network = NetworkType::from(args.network);

    let (scope, bytes) = if args.summary {
        (
            "wifi (summary)".to_string(),
            client.wifi_usage_summary(start_ms, end_ms).await?,
        )
    } else if args.package {
        (
            format!("{network} (this package)").to_lowercase(),
            client.package_usage_stats(network, start_ms, end_ms).await?,
        )
    } else {
        let bytes = match network {
            NetworkType::Wifi => client.wifi_usage_stats(start_ms, end_ms).await?,
            NetworkType::Mobile => client.mobile_usage_stats(start_ms, end_ms).await?,
        };
        (network.to_string().to_lowercase(), bytes)
    };

    let breakdown = UsageBreakdown::from(bytes);
    let row = UsageRow {
        scope,
        bytes: breakdown.bytes,
        kb: breakdown.kb,
        mb: breakdown.mb,
        gb: breakdown.gb,
    };

    let out = output::render_list(
        global.output,
        std::slice::from_ref(&row),
        |r| UsageRow {
            scope: r.scope.clone(),
            bytes: r.bytes,
            kb: r.kb,
            mb: r.mb,
            gb: r.gb,
        },
        |r| r.bytes.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time_accepts_millis_and_rfc3339() {
        assert_eq!(parse_time("1700000000000", "start").unwrap(), 1_700_000_000_000);
        assert_eq!(
            parse_time("1970-01-01T00:00:01Z", "start").unwrap(),
            1000
        );
        assert!(matches!(
            parse_time("soon", "start"),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn default_range_is_the_last_hour() {
        let args = UsageArgs {
            start: None,
            end: Some("2000000".into()),
            network: crate::cli::NetworkArg::Wifi,
            package: false,
            summary: false,
        };
        let (start_ms, end_ms) = resolve_range(&args).unwrap();
        assert_eq!(end_ms, 2_000_000);
        assert_eq!(start_ms, 2_000_000 - DEFAULT_WINDOW_MS);
    }
}
