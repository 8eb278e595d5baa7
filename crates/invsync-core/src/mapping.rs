// ── Field mapping ──
//
// Translates logical report keys into the physical column names of the
// devices table. A key with no entry, or an entry mapped to the empty
// string, is unmapped: it is dropped from every store payload, never
// treated as an error.

use std::collections::{BTreeMap, BTreeSet};

/// Logical → physical column mapping for devices, plus the notes table
/// layout and the set of silent keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    /// Devices table name.
    pub devices_table: String,
    /// Notes (audit log) table name.
    pub notes_table: String,
    /// Notes column referencing the device row.
    pub note_device_column: String,
    /// Notes column holding the free-text log.
    pub note_text_column: String,
    columns: BTreeMap<String, String>,
    silent: BTreeSet<String>,
}

impl FieldMapping {
    pub fn new(
        devices_table: impl Into<String>,
        notes_table: impl Into<String>,
        note_device_column: impl Into<String>,
        note_text_column: impl Into<String>,
    ) -> Self {
        Self {
            devices_table: devices_table.into(),
            notes_table: notes_table.into(),
            note_device_column: note_device_column.into(),
            note_text_column: note_text_column.into(),
            columns: BTreeMap::new(),
            silent: BTreeSet::new(),
        }
    }

    /// Map one logical key to a physical column.
    #[must_use]
    pub fn with_column(mut self, logical: impl Into<String>, physical: impl Into<String>) -> Self {
        self.columns.insert(logical.into(), physical.into());
        self
    }

    #[must_use]
    pub fn with_columns<K, V>(mut self, columns: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.columns
            .extend(columns.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Mark logical keys whose changes never appear in audit text.
    #[must_use]
    pub fn with_silent<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.silent.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Physical column for a logical key, or `None` when unmapped.
    pub fn physical(&self, logical: &str) -> Option<&str> {
        self.columns
            .get(logical)
            .map(String::as_str)
            .filter(|column| !column.is_empty())
    }

    pub fn is_silent(&self, logical: &str) -> bool {
        self.silent.contains(logical)
    }
}

/// Where API tokens are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMapping {
    pub table: String,
    pub token_column: String,
}

impl Default for AccountMapping {
    fn default() -> Self {
        Self {
            table: "Accounts".into(),
            token_column: "Token".into(),
        }
    }
}
