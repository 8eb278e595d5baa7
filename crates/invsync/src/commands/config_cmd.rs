//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::{CliError, exit_code};

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<i32, CliError> {
    match args.command {
        ConfigCommand::Path => {
            if global.config.is_empty() {
                println!("{}", invsync_config::mappings_path().display());
                println!("{}", invsync_config::config_path().display());
            } else {
                for path in &global.config {
                    println!("{}", path.display());
                }
            }
        }
        ConfigCommand::Show => {
            let cfg = super::load_config(global)?;
            print!("{}", cfg.redacted().to_toml()?);
        }
    }
    Ok(exit_code::SUCCESS)
}
