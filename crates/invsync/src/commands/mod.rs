//! Subcommand handlers. Each returns the process exit code on success.

pub mod config_cmd;
pub mod ingest;

use invsync_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load configuration from `--config` files when given, else the canonical paths.
pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let cfg = if global.config.is_empty() {
        invsync_config::load_config()?
    } else {
        invsync_config::load_config_from(&global.config)?
    };
    Ok(cfg)
}
