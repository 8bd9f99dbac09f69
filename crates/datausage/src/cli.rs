//! Argument definitions for the `datausage` demo CLI.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use datausage_api::NetworkType;

#[derive(Debug, Parser)]
#[command(
    name = "datausage",
    version,
    about = "Query network data usage, connectivity, and change events",
    long_about = "Demo front end for the datausage-api client library.\n\
                  Runs against a simulated platform bridge, so it works\n\
                  anywhere -- the numbers are synthetic but the full query,\n\
                  permission, and event machinery is real."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format
    #[arg(
        short = 'o',
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table
    )]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress normal output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    JsonCompact,
    Plain,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show connectivity state and the active network type
    Status,

    /// Read byte counters over a time range
    Usage(UsageArgs),

    /// Subscribe to connectivity and usage events and print each delivery
    Watch(WatchArgs),

    /// Request the usage-stats permission and report the grant
    Permissions,
}

#[derive(Debug, Args)]
pub struct UsageArgs {
    /// Range start: Unix millis or RFC3339 (default: one hour ago)
    #[arg(long)]
    pub start: Option<String>,

    /// Range end: Unix millis or RFC3339 (default: now)
    #[arg(long)]
    pub end: Option<String>,

    /// Which network's counters to read
    #[arg(long, value_enum, default_value_t = NetworkArg::Wifi)]
    pub network: NetworkArg,

    /// Restrict to this package's own traffic
    #[arg(long)]
    pub package: bool,

    /// Use the single-call native bucket summary (Wi-Fi only)
    #[arg(long, conflicts_with_all = ["network", "package"])]
    pub summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NetworkArg {
    Wifi,
    Mobile,
}

impl From<NetworkArg> for NetworkType {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::Wifi => NetworkType::Wifi,
            NetworkArg::Mobile => NetworkType::Mobile,
        }
    }
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many events
    #[arg(long, default_value_t = 6)]
    pub count: u32,
}
