// ── Inventory report ──
//
// A scan report is a flat map of logical field name → value. Absent keys
// are left untouched; keys present with `null` are carried but never
// written. Every transformation returns a new `Report` rather than
// editing the caller's copy.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Account;

pub const MAC_PRIMARY: &str = "mac_primary";
pub const MAC_SECONDARY: &str = "mac_secondary";
pub const IP_PRIMARY: &str = "ip_primary";
pub const IP_SECONDARY: &str = "ip_secondary";
pub const STATUS: &str = "status";
pub const ACCOUNT: &str = "account";

/// Control field listing the logical keys that must not overwrite a
/// populated stored value. Never mapped, written, or diffed.
pub const WEAK_KEYS: &str = "_weak";

/// Value forced onto `status` for every reconciled report.
pub const ACTIVE_STATUS: &str = "Active";

/// `null` and the empty string count as "no stored value".
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// One inbound inventory report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report(Map<String, Value>);

impl Report {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Logical fields in key order, excluding the weak-keys control field.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .iter()
            .filter(|(k, _)| k.as_str() != WEAK_KEYS)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// `true` when at least one of `mac_primary` / `mac_secondary` carries
    /// a non-null value.
    pub fn has_mac(&self) -> bool {
        !self.macs().is_empty()
    }

    /// Non-null MAC values in primary, secondary order.
    pub fn macs(&self) -> Vec<Value> {
        [MAC_PRIMARY, MAC_SECONDARY]
            .iter()
            .filter_map(|k| self.0.get(*k))
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }

    /// Logical keys marked weak for this report.
    ///
    /// Accepts either a JSON array of names or a comma-separated string.
    pub fn weak_keys(&self) -> BTreeSet<String> {
        match self.0.get(WEAK_KEYS) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Some(Value::String(list)) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            _ => BTreeSet::new(),
        }
    }

    /// Copy of this report with `status = Active` and `account = <id>`,
    /// whatever the sender supplied for either.
    #[must_use]
    pub fn with_overrides(&self, account: &Account) -> Self {
        let mut fields = self.0.clone();
        fields.insert(STATUS.into(), Value::from(ACTIVE_STATUS));
        fields.insert(ACCOUNT.into(), Value::from(account.id));
        Self(fields)
    }

    /// Copy of this report with the values under `a` and `b` exchanged.
    ///
    /// Presence moves with the value: if only `a` was present, afterwards
    /// only `b` is.
    #[must_use]
    pub fn with_swapped(&self, a: &str, b: &str) -> Self {
        let mut fields = self.0.clone();
        let first = fields.remove(a);
        let second = fields.remove(b);
        if let Some(v) = second {
            fields.insert(a.to_owned(), v);
        }
        if let Some(v) = first {
            fields.insert(b.to_owned(), v);
        }
        Self(fields)
    }
}

impl From<Map<String, Value>> for Report {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
