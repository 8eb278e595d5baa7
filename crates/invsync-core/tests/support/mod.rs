// In-memory `RecordStore` double that records every call.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;

use invsync_core::{CoreError, FieldMapping, Fields, Filter, Record, RecordId, RecordStore};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        table: String,
        filter: Filter,
        limit: Option<usize>,
    },
    Add {
        table: String,
        fields: Fields,
    },
    Update {
        table: String,
        id: RecordId,
        fields: Fields,
    },
}

pub struct MemoryStore {
    tables: Mutex<BTreeMap<String, Vec<Record>>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<i64>,
    fail_reads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(100),
            fail_reads: false,
        }
    }

    pub fn with_record(self, table: &str, id: i64, fields: Value) -> Self {
        let record = Record {
            id: RecordId(id),
            fields: as_fields(fields),
        };
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_owned())
            .or_default()
            .push(record);
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Get { .. }))
            .collect()
    }

    pub fn records(&self, table: &str) -> Vec<Record> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn matches_filter(record: &Record, filter: &Filter) -> bool {
    filter.iter().all(|(column, accepted)| {
        record
            .field(column)
            .is_some_and(|value| accepted.contains(value))
    })
}

impl RecordStore for MemoryStore {
    async fn get(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Record>, CoreError> {
        self.log(Call::Get {
            table: table.to_owned(),
            filter: filter.clone(),
            limit,
        });
        if self.fail_reads {
            return Err(CoreError::Store {
                message: "HTTP 500: boom".into(),
                status: Some(500),
            });
        }

        let tables = self.tables.lock().unwrap();
        let matching = tables
            .get(table)
            .into_iter()
            .flatten()
            .filter(|r| matches_filter(r, filter))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn add(&self, table: &str, fields: &Fields) -> Result<RecordId, CoreError> {
        self.log(Call::Add {
            table: table.to_owned(),
            fields: fields.clone(),
        });
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            RecordId(*next)
        };
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_owned())
            .or_default()
            .push(Record {
                id,
                fields: fields.clone(),
            });
        Ok(id)
    }

    async fn update(&self, table: &str, id: RecordId, fields: &Fields) -> Result<(), CoreError> {
        self.log(Call::Update {
            table: table.to_owned(),
            id,
            fields: fields.clone(),
        });
        let mut tables = self.tables.lock().unwrap();
        let record = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| CoreError::Store {
                message: format!("no record {id} in {table}"),
                status: Some(404),
            })?;
        record
            .fields
            .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }
}

pub fn as_fields(value: Value) -> Fields {
    value.as_object().cloned().unwrap()
}

/// Mapping used across the reconciliation tests.
pub fn mapping() -> FieldMapping {
    FieldMapping::new("Devices", "Notes", "Device", "Note")
        .with_columns([
            ("account", "AccountId"),
            ("status", "Status"),
            ("mac_primary", "MacAddr"),
            ("mac_secondary", "MacAddr2"),
            ("ip_primary", "IpAddr"),
            ("ip_secondary", "IpAddr2"),
            ("hostname", "Hostname"),
            ("os", "OperatingSystem"),
            ("discover_log", "DiscoverLog"),
        ])
        .with_silent(["discover_log", "account", "status"])
}
