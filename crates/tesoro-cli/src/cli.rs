use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tesoro_types::{CheckId, ClientId};

#[derive(Parser)]
#[command(
    name = "tesoro",
    about = "Tesoro: client account statements and check lifecycles",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Running balance of a client account, optionally over a period
    Statement(StatementArgs),
    /// Credit available against a limit
    Exposure(ExposureArgs),
    /// Print the check status transition table
    Lifecycle,
    /// Status history of one check from an event log
    History(HistoryArgs),
    /// Emitted checks past their due date
    Expiring(ExpiringArgs),
}

#[derive(Args)]
pub struct StatementArgs {
    /// JSON array of movements
    pub movements: PathBuf,
    /// Only movements of this client
    #[arg(long)]
    pub client: Option<ClientId>,
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Args)]
pub struct ExposureArgs {
    /// JSON array of movements
    pub movements: PathBuf,
    #[arg(long)]
    pub client: Option<ClientId>,
    #[arg(long)]
    pub limit: Decimal,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// JSON array of status events
    pub events: PathBuf,
    #[arg(long)]
    pub check: CheckId,
}

#[derive(Args)]
pub struct ExpiringArgs {
    /// JSON array of checks
    pub checks: PathBuf,
    /// Defaults to the local date
    #[arg(long)]
    pub today: Option<NaiveDate>,
    /// Days past due; defaults to `expiry_grace_days` from the config
    #[arg(long)]
    pub grace: Option<u32>,
}
