//! Clap derive structures for the `invsync` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// invsync -- reconcile device inventory reports into a Grist document
#[derive(Debug, Parser)]
#[command(
    name = "invsync",
    version,
    about = "Reconcile device inventory reports into a Grist document",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration files, read in order (default: mappings.toml, config.toml)
    #[arg(long = "config", short = 'c', global = true, value_name = "PATH")]
    pub config: Vec<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile one inventory report
    Ingest(IngestArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Account token the report is submitted with
    #[arg(long, short = 't', env = "INVSYNC_TOKEN", hide_env_values = true)]
    pub token: String,

    /// JSON report file, or "-" for stdin
    #[arg(long, short = 'r', default_value = "-")]
    pub report: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file locations
    Path,

    /// Print the effective configuration (API key redacted)
    Show,
}
