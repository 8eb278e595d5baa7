// ── Interface slot reconciliation ──
//
// A scan may enumerate a device's wired and wireless NICs in either order.
// When the report's primary MAC is the record's stored secondary (or the
// report's secondary is the stored primary), the report's MAC and IP slots
// are exchanged so the diff compares like with like.

use std::collections::BTreeSet;

use tracing::debug;

use crate::mapping::FieldMapping;
use crate::model::{
    IP_PRIMARY, IP_SECONDARY, MAC_PRIMARY, MAC_SECONDARY, Record, Report, is_empty_value,
};

/// Which way the report's interfaces were crossed relative to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSwap {
    /// Report's `mac_primary` is the record's secondary MAC.
    PrimaryToSecondary,
    /// Report's `mac_secondary` is the record's primary MAC.
    SecondaryToPrimary,
}

/// Detect a crossed interface assignment. Rule A is checked before rule B;
/// at most one fires.
pub fn detect(record: &Record, mapping: &FieldMapping, report: &Report) -> Option<SlotSwap> {
    let crossed = |report_key: &str, stored_key: &str| -> bool {
        let Some(incoming) = report.get(report_key).filter(|v| !v.is_null()) else {
            return false;
        };
        mapping
            .physical(stored_key)
            .and_then(|column| record.field(column))
            .is_some_and(|stored| !is_empty_value(stored) && stored == incoming)
    };

    if crossed(MAC_PRIMARY, MAC_SECONDARY) {
        Some(SlotSwap::PrimaryToSecondary)
    } else if crossed(MAC_SECONDARY, MAC_PRIMARY) {
        Some(SlotSwap::SecondaryToPrimary)
    } else {
        None
    }
}

/// Return the report with its primary/secondary pairing aligned to the
/// stored record, together with `weak_keys` renamed to match.
///
/// Both directions apply the same exchange: each MAC and IP value moves
/// to the opposite slot, and a slot whose partner was absent becomes
/// absent itself. A weak mark follows its value to the new slot.
pub fn reconcile(
    record: &Record,
    mapping: &FieldMapping,
    report: &Report,
    weak_keys: &BTreeSet<String>,
) -> (Report, BTreeSet<String>) {
    match detect(record, mapping, report) {
        Some(swap) => {
            debug!(device = %record.id, ?swap, "report interfaces crossed, swapping slots");
            let report = report
                .with_swapped(MAC_PRIMARY, MAC_SECONDARY)
                .with_swapped(IP_PRIMARY, IP_SECONDARY);
            let weak_keys = weak_keys
                .iter()
                .map(|key| swapped_key(key).to_owned())
                .collect();
            (report, weak_keys)
        }
        None => (report.clone(), weak_keys.clone()),
    }
}

/// Slot a value under `key` occupies after an exchange.
fn swapped_key(key: &str) -> &str {
    match key {
        MAC_PRIMARY => MAC_SECONDARY,
        MAC_SECONDARY => MAC_PRIMARY,
        IP_PRIMARY => IP_SECONDARY,
        IP_SECONDARY => IP_PRIMARY,
        other => other,
    }
}
