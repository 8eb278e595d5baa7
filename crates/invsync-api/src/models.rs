// Grist records API wire types
//
// Records are `{ "id": <int>, "fields": { <column>: <value> } }`. Column
// values are kept as raw `serde_json::Value` so that callers compare exactly
// what the document stores, with no coercion.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column name → value payload of a single record.
pub type Fields = serde_json::Map<String, Value>;

/// Record filter: every column is ANDed, each column's values are ORed.
///
/// Serialized verbatim as the `filter` query parameter,
/// e.g. `{"Account": [3], "MacAddr": ["aa:bb", "cc:dd"]}`.
pub type Filter = BTreeMap<String, Vec<Value>>;

/// Row id assigned by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Value::from(id.0)
    }
}

/// A stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub fields: Fields,
}

impl Record {
    /// Stored value of a column, if the column exists.
    pub fn field(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }
}

// ── Envelopes ───────────────────────────────────────────────────────

/// `GET .../records` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordList {
    #[serde(default)]
    pub records: Vec<Record>,
}

/// `POST .../records` response body: ids only.
#[derive(Debug, Deserialize)]
pub(crate) struct AddedRecords {
    pub records: Vec<AddedRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddedRecord {
    pub id: RecordId,
}

/// Request body for `POST` (no `id`) and `PATCH` (with `id`).
#[derive(Debug, Serialize)]
pub(crate) struct RecordsPayload<'a> {
    pub records: Vec<RecordPayload<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecordPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub fields: &'a Fields,
}
