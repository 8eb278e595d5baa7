//! `invsync ingest`: one report through the reconciliation pipeline.

use tokio::io::AsyncReadExt;
use tracing::info;

use invsync_core::{GristStore, Report, device_inventory, resolve_account};

use crate::cli::{GlobalOpts, IngestArgs};
use crate::error::{CliError, exit_code};

pub async fn handle(args: &IngestArgs, global: &GlobalOpts) -> Result<i32, CliError> {
    let report = read_report(&args.report).await?;

    let cfg = super::load_config(global)?;
    let mapping = cfg.field_mapping()?;
    let accounts = cfg.account_mapping()?;
    let store = GristStore::connect(&cfg.store_config()?)?;

    let account = resolve_account(&store, &accounts, &args.token)
        .await?
        .ok_or(CliError::InvalidToken)?;

    let outcome = device_inventory(&mapping, &store, &account, &report).await?;
    info!(status = outcome.status, message = %outcome.message, "report processed");

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(if outcome.is_success() {
        exit_code::SUCCESS
    } else {
        exit_code::USAGE
    })
}

/// Read a report from a file path, or stdin for `-`.
async fn read_report(source: &str) -> Result<Report, CliError> {
    let raw = if source == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(source).await?
    };
    Ok(serde_json::from_str(&raw)?)
}
