// ── Device inventory entry point ──
//
// resolve → reconcile slots → merge → mutate → audit, strictly in that
// order for one report. Store faults abort the run; nothing is retried.

use serde::Serialize;
use tracing::{debug, info};

use crate::audit;
use crate::error::CoreError;
use crate::mapping::FieldMapping;
use crate::merge::{self, Mutation};
use crate::model::{Account, RecordId, Report};
use crate::resolver;
use crate::slots;
use crate::store::RecordStore;

pub const NO_MAC_MESSAGE: &str = "No MAC address provided";

/// Response triple handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub status: u16,
    pub message: String,
    pub data: Option<OutcomeData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeData {
    pub id: RecordId,
}

impl Outcome {
    fn saved(message: &str, id: RecordId) -> Self {
        Self {
            status: 200,
            message: message.to_owned(),
            data: Some(OutcomeData { id }),
        }
    }

    fn rejected(message: &str) -> Self {
        Self {
            status: 400,
            message: message.to_owned(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Reconcile one inventory report for `account` against the device registry.
///
/// A report without any MAC is rejected with status 400 before the store
/// is touched.
///
/// Reports are not serialized against each other: two concurrent reports
/// for the same unknown MAC can both create a device.
pub async fn device_inventory<S: RecordStore>(
    mapping: &FieldMapping,
    store: &S,
    account: &Account,
    report: &Report,
) -> Result<Outcome, CoreError> {
    if !report.has_mac() {
        debug!(account = %account.id, "report rejected: no MAC address");
        return Ok(Outcome::rejected(NO_MAC_MESSAGE));
    }

    let report = report.with_overrides(account);

    let existing = resolver::resolve(store, mapping, account.id, &report).await?;
    let weak_keys = report.weak_keys();
    let (report, weak_keys) = match &existing {
        Some(record) => slots::reconcile(record, mapping, &report, &weak_keys),
        None => (report, weak_keys),
    };
    let plan = merge::merge(existing.as_ref(), &report, &weak_keys, mapping);

    let id = match &plan.mutation {
        Mutation::Unchanged(id) => *id,
        Mutation::Update { id, fields } => {
            store.update(&mapping.devices_table, *id, fields).await?;
            *id
        }
        Mutation::Create { fields } => store.add(&mapping.devices_table, fields).await?,
    };

    audit::record(store, mapping, id, plan.audit.as_deref()).await?;

    info!(
        account = %account.id,
        device = %id,
        changes = plan.changes.len(),
        outcome = plan.message(),
        "inventory report reconciled"
    );
    Ok(Outcome::saved(plan.message(), id))
}
