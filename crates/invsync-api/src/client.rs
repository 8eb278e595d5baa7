// Grist records HTTP client
//
// Wraps `reqwest::Client` with document-scoped URL construction, bearer
// auth, and envelope unwrapping for the three records calls the inventory
// engine needs. Pagination and sorting are deliberately absent.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{
    AddedRecords, Fields, Filter, Record, RecordId, RecordList, RecordPayload, RecordsPayload,
};
use crate::transport::TransportConfig;

/// Raw HTTP client for a single Grist document.
///
/// All methods return unwrapped payloads -- the `{ records: [...] }`
/// envelope is stripped before the caller sees it.
pub struct GristClient {
    http: reqwest::Client,
    base_url: Url,
    doc_id: String,
    api_key: SecretString,
}

impl GristClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the Grist host root (e.g. `https://docs.getgrist.com`).
    pub fn new(
        base_url: Url,
        doc_id: String,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, doc_id, api_key))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        doc_id: String,
        api_key: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            doc_id,
            api_key,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/api/docs/{doc}/tables/{table}/records`, with `doc` and
    /// `table` percent-encoded as path segments.
    pub(crate) fn records_url(&self, table: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["api", "docs", self.doc_id.as_str(), "tables", table, "records"]);
        Ok(url)
    }

    // ── Records ──────────────────────────────────────────────────────

    /// Fetch records matching `filter`, optionally capped at `limit`.
    pub async fn list_records(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Record>, Error> {
        let mut url = self.records_url(table)?;
        if !filter.is_empty() {
            let encoded = serde_json::to_string(filter)?;
            url.query_pairs_mut().append_pair("filter", &encoded);
        }
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }

        debug!("GET {}", url);
        let resp = self
            .authorized(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        let list: RecordList = Self::parse_json(resp).await?;
        trace!(table, count = list.records.len(), "records fetched");
        Ok(list.records)
    }

    /// Add a single record, returning the id the document assigned.
    pub async fn add_record(&self, table: &str, fields: &Fields) -> Result<RecordId, Error> {
        let url = self.records_url(table)?;
        let body = RecordsPayload {
            records: vec![RecordPayload { id: None, fields }],
        };

        debug!("POST {}", url);
        let resp = self
            .authorized(self.http.post(url).json(&body))
            .send()
            .await
            .map_err(Error::Transport)?;

        let added: AddedRecords = Self::parse_json(resp).await?;
        added
            .records
            .first()
            .map(|r| r.id)
            .ok_or_else(|| Error::Deserialization {
                message: "add response contained no record ids".into(),
                body: String::new(),
            })
    }

    /// Patch the given columns of one existing record.
    pub async fn update_record(
        &self,
        table: &str,
        id: RecordId,
        fields: &Fields,
    ) -> Result<(), Error> {
        let url = self.records_url(table)?;
        let body = RecordsPayload {
            records: vec![RecordPayload {
                id: Some(id),
                fields,
            }],
        };

        debug!("PATCH {} (id {})", url, id);
        let resp = self
            .authorized(self.http.patch(url).json(&body))
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp).await.map(|_| ())
    }

    // ── Response helpers ─────────────────────────────────────────────

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(self.api_key.expose_secret())
    }

    /// Map non-success statuses into `Error`, passing success through.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("API key rejected (HTTP {})", status.as_u16()),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview,
            });
        }

        Ok(resp)
    }

    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}
