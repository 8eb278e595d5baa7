// ── Domain model ──
//
// Inbound reports, resolved accounts, and the stored record types
// re-exported from the api crate.

mod account;
mod report;

pub use account::Account;
pub use report::{
    ACCOUNT, ACTIVE_STATUS, IP_PRIMARY, IP_SECONDARY, MAC_PRIMARY, MAC_SECONDARY, Report, STATUS,
    WEAK_KEYS, is_empty_value,
};

pub use invsync_api::{Fields, Filter, Record, RecordId};
