// ── Identity resolution ──
//
// Matches a report to at most one existing device of the same account.
// The primary-MAC column is queried before the secondary-MAC column, with
// the full candidate list each time, so resolution order stays fixed even
// if a MAC were ever stored in both roles.

use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::mapping::{AccountMapping, FieldMapping};
use crate::model::{ACCOUNT, Account, Filter, MAC_PRIMARY, MAC_SECONDARY, Record, RecordId, Report};
use crate::store::{RecordStore, find_one};

/// Find the device owned by `account_id` whose primary or secondary MAC is
/// one of the report's MACs.
///
/// Returns `Ok(None)` when the report carries no usable MAC or nothing
/// matches. A MAC slot with no mapped column is skipped.
pub async fn resolve<S: RecordStore>(
    store: &S,
    mapping: &FieldMapping,
    account_id: RecordId,
    report: &Report,
) -> Result<Option<Record>, CoreError> {
    let candidates = report.macs();
    if candidates.is_empty() {
        return Ok(None);
    }

    let account_column = mapping.physical(ACCOUNT).ok_or_else(|| CoreError::Config {
        message: format!("no devices column mapped for '{ACCOUNT}'"),
    })?;

    for slot in [MAC_PRIMARY, MAC_SECONDARY] {
        let Some(mac_column) = mapping.physical(slot) else {
            continue;
        };

        let mut filter = Filter::new();
        filter.insert(account_column.to_owned(), vec![Value::from(account_id)]);
        filter.insert(mac_column.to_owned(), candidates.clone());

        if let Some(record) = find_one(store, &mapping.devices_table, &filter).await? {
            debug!(device = %record.id, column = mac_column, "matched existing device");
            return Ok(Some(record));
        }
    }

    Ok(None)
}

/// Look up the account owning `token`.
pub async fn resolve_account<S: RecordStore>(
    store: &S,
    mapping: &AccountMapping,
    token: &str,
) -> Result<Option<Account>, CoreError> {
    let mut filter = Filter::new();
    filter.insert(mapping.token_column.clone(), vec![Value::from(token)]);

    Ok(find_one(store, &mapping.table, &filter)
        .await?
        .map(Account::from))
}
