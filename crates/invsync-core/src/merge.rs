// ── Diff & merge ──
//
// Plans the store mutation for one (post-slot-reconciliation) report.
// Pure: no I/O happens here, the caller executes the plan.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::mapping::FieldMapping;
use crate::model::{Fields, Record, RecordId, Report, is_empty_value};

pub const UNCHANGED_MESSAGE: &str = "no changes detected";
pub const UPDATED_MESSAGE: &str = "changes applied to existing device";
pub const CREATED_MESSAGE: &str = "new device added to inventory";

/// Audit text for a newly created device.
pub const CREATED_NOTE: &str = "New device added from inventory update.";
const CHANGES_HEADER: &str = "Detected changes from inventory update:\n\n* ";

/// The store mutation a report calls for.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Existing device, nothing to write.
    Unchanged(RecordId),
    /// Existing device, patch the staged columns.
    Update { id: RecordId, fields: Fields },
    /// No existing device, add one with the staged columns.
    Create { fields: Fields },
}

impl Mutation {
    /// Outcome message reported to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unchanged(_) => UNCHANGED_MESSAGE,
            Self::Update { .. } => UPDATED_MESSAGE,
            Self::Create { .. } => CREATED_MESSAGE,
        }
    }
}

/// One audited column change.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub column: String,
    pub old: Value,
    pub new: Value,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed from [{}] to [{}]",
            self.column,
            render(&self.old),
            render(&self.new)
        )
    }
}

/// Strings render raw, `null` as nothing, everything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Result of diffing a report against the store.
#[derive(Debug, Clone, PartialEq)]
pub struct MergePlan {
    pub mutation: Mutation,
    /// Audited changes, in report key order. Silent keys are absent.
    pub changes: Vec<Change>,
    /// Note text to append, if any.
    pub audit: Option<String>,
}

impl MergePlan {
    pub fn message(&self) -> &'static str {
        self.mutation.message()
    }
}

/// Diff `report` against `existing` (or plan a creation when `None`).
///
/// For an existing record a key is staged only if it is mapped, non-null,
/// its column exists on the record, it is not weak against a populated
/// value, and its value differs from what is stored.
pub fn merge(
    existing: Option<&Record>,
    report: &Report,
    weak_keys: &BTreeSet<String>,
    mapping: &FieldMapping,
) -> MergePlan {
    match existing {
        Some(record) => merge_existing(record, report, weak_keys, mapping),
        None => plan_create(report, mapping),
    }
}

fn merge_existing(
    record: &Record,
    report: &Report,
    weak_keys: &BTreeSet<String>,
    mapping: &FieldMapping,
) -> MergePlan {
    let mut fields = Fields::new();
    let mut changes = Vec::new();

    for (key, value) in report.fields() {
        let Some(column) = mapping.physical(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let Some(stored) = record.field(column) else {
            continue;
        };
        if weak_keys.contains(key) && !is_empty_value(stored) {
            debug!(device = %record.id, key, "weak value kept off populated column");
            continue;
        }
        if stored == value {
            continue;
        }

        if !mapping.is_silent(key) {
            changes.push(Change {
                column: column.to_owned(),
                old: stored.clone(),
                new: value.clone(),
            });
        }
        fields.insert(column.to_owned(), value.clone());
    }

    let audit = if changes.is_empty() {
        None
    } else {
        let lines: Vec<String> = changes.iter().map(ToString::to_string).collect();
        Some(format!("{CHANGES_HEADER}{}", lines.join("\n* ")))
    };

    let mutation = if fields.is_empty() {
        Mutation::Unchanged(record.id)
    } else {
        Mutation::Update {
            id: record.id,
            fields,
        }
    };

    MergePlan {
        mutation,
        changes,
        audit,
    }
}

fn plan_create(report: &Report, mapping: &FieldMapping) -> MergePlan {
    let fields: Fields = report
        .fields()
        .filter(|(_, value)| !value.is_null())
        .filter_map(|(key, value)| {
            mapping
                .physical(key)
                .map(|column| (column.to_owned(), value.clone()))
        })
        .collect();

    MergePlan {
        mutation: Mutation::Create { fields },
        changes: Vec::new(),
        audit: Some(CREATED_NOTE.to_owned()),
    }
}
