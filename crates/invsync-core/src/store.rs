// ── Record store seam ──
//
// The engine talks to storage only through `RecordStore`. `GristStore`
// forwards to `invsync_api::GristClient`; tests substitute an in-memory
// double.

use std::future::Future;

use invsync_api::{GristClient, TransportConfig};

use crate::config::StoreConfig;
use crate::error::CoreError;
use crate::model::{Fields, Filter, Record, RecordId};

/// Minimal record-store contract: filtered read, single add, single update.
///
/// `filter` ANDs its columns and ORs each column's values.
pub trait RecordStore: Send + Sync {
    fn get(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<Record>, CoreError>> + Send;

    fn add(
        &self,
        table: &str,
        fields: &Fields,
    ) -> impl Future<Output = Result<RecordId, CoreError>> + Send;

    fn update(
        &self,
        table: &str,
        id: RecordId,
        fields: &Fields,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// `get` with `limit = 1`: a single record or none.
pub async fn find_one<S: RecordStore>(
    store: &S,
    table: &str,
    filter: &Filter,
) -> Result<Option<Record>, CoreError> {
    Ok(store.get(table, filter, Some(1)).await?.into_iter().next())
}

/// Production store backed by a Grist document.
pub struct GristStore {
    client: GristClient,
}

impl GristStore {
    pub fn connect(config: &StoreConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: (&config.tls).into(),
            timeout: config.timeout,
        };
        let client = GristClient::new(
            config.url.clone(),
            config.doc_id.clone(),
            config.api_key.clone(),
            &transport,
        )?;
        Ok(Self { client })
    }
}

impl RecordStore for GristStore {
    async fn get(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Record>, CoreError> {
        Ok(self.client.list_records(table, filter, limit).await?)
    }

    async fn add(&self, table: &str, fields: &Fields) -> Result<RecordId, CoreError> {
        Ok(self.client.add_record(table, fields).await?)
    }

    async fn update(&self, table: &str, id: RecordId, fields: &Fields) -> Result<(), CoreError> {
        Ok(self.client.update_record(table, id, fields).await?)
    }
}
