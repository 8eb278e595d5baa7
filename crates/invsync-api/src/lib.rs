// invsync-api: Async client for the Grist records API (list, add, update)

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::GristClient;
pub use error::Error;
pub use models::{Fields, Filter, Record, RecordId};
pub use transport::{TlsMode, TransportConfig};
