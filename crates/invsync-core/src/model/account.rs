use serde::Serialize;

use super::{Fields, Record, RecordId};

/// An account resolved from an API token.
///
/// Only `id` matters to reconciliation: every device lookup is scoped to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: RecordId,
    pub fields: Fields,
}

impl Account {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: Fields::new(),
        }
    }
}

impl From<Record> for Account {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            fields: record.fields,
        }
    }
}
