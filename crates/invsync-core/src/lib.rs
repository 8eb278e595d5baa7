//! Reconciliation engine between inventory scan reports and a Grist-backed
//! device registry.
//!
//! One inbound report flows through a fixed pipeline:
//!
//! - **[`resolver`]** — finds at most one existing device for the account,
//!   matching the report's MACs against the primary-MAC column first and the
//!   secondary-MAC column second.
//! - **[`slots`]** — normalizes the report's primary/secondary interface
//!   assignment to the stored record's, so scan enumeration order never
//!   shows up as a change.
//! - **[`merge`]** — diffs the report against the record under the field
//!   mapping, weak-key and silent-key rules, and plans the store mutation
//!   plus the audit text.
//! - **[`audit`]** — appends a note linked to the device whenever anything
//!   changed or a device was created.
//!
//! [`device_inventory`] drives the whole pipeline against any
//! [`RecordStore`]; [`GristStore`] is the production implementation.

pub mod audit;
pub mod config;
pub mod error;
pub mod inventory;
pub mod mapping;
pub mod merge;
pub mod model;
pub mod resolver;
pub mod slots;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{StoreConfig, TlsVerification};
pub use error::CoreError;
pub use inventory::{Outcome, OutcomeData, device_inventory};
pub use mapping::{AccountMapping, FieldMapping};
pub use merge::{MergePlan, Mutation};
pub use model::{Account, Fields, Filter, Record, RecordId, Report};
pub use resolver::resolve_account;
pub use store::{GristStore, RecordStore};
