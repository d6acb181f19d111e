//! NameShield DNS API v2 record client
//!
//! One method per API call plus two composed operations
//! ([`ensure_txt_record`](NameShieldClient::ensure_txt_record) and
//! [`remove_txt_record`](NameShieldClient::remove_txt_record)) that check
//! existing state first so a retrying host does not pile up duplicates.
//!
//! ## API Calls
//!
//! ```http
//! GET    /zones/{zone}/records?name={name}&type=TXT
//! POST   /zones/{zone}/records              {"name","type":"TXT","data","ttl","comment"}
//! PUT    /zones/{zone}/records/{name}/TXT   {"data","ttl","comment"}
//! DELETE /zones/{zone}/records/{name}/TXT
//! Authorization: Bearer <token>
//! ```

use acme_dns_core::traits::{ExchangeLogger, NoopExchangeLogger, RequestSnapshot, ResponseSnapshot};
use acme_dns_core::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::types::{
    CreateRecordRequest, DnsRecord, RecordPage, RecordType, SearchResponse, UpdateRecordRequest,
};

/// NameShield production API base URL
pub const NAMESHIELD_API_BASE: &str = "https://api.nameshield.net/dns/v2";

/// NameShield OTE (test environment) API base URL
pub const NAMESHIELD_OTE_API_BASE: &str = "https://ote-api.nameshield.net/dns/v2";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Comment attached to records this client writes
const RECORD_COMMENT: &str = "Created by acme-dns";

const OP_SEARCH: &str = "search TXT records";
const OP_CREATE: &str = "create TXT record";
const OP_UPDATE: &str = "update TXT record";
const OP_DELETE: &str = "delete TXT record";

/// Build the HTTP client shared by record clients
pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(DEFAULT_HTTP_TIMEOUT)
        .build()
        .map_err(|e| Error::transport("Failed to build HTTP client", e))
}

/// Authenticated client for the NameShield record API
///
/// Holds one API key for its whole lifetime. Makes no retries and keeps no
/// state between calls; every method is a single request (or, for the
/// composed operations, a search followed by one write).
///
/// # Security
///
/// The Debug implementation does NOT expose the API key, and the key is
/// redacted from every snapshot handed to the exchange logger.
pub struct NameShieldClient {
    /// ⚠️ NEVER log this value
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    exchange_logger: Arc<dyn ExchangeLogger>,
}

impl std::fmt::Debug for NameShieldClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameShieldClient")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NameShieldClient {
    /// Create a client against the production API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_http_client(api_key, NAMESHIELD_API_BASE, build_http_client()?)
    }

    /// Create a client reusing an existing HTTP client
    ///
    /// The HTTP client is expected to carry the request timeout; see
    /// [`build_http_client`].
    pub fn with_http_client(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("NameShield API key cannot be empty"));
        }

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            exchange_logger: Arc::new(NoopExchangeLogger),
        })
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Capture every exchange through `logger`
    pub fn with_exchange_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.exchange_logger = logger;
        self
    }

    /// API endpoint in use
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn records_url(&self, zone: &str) -> String {
        format!("{}/zones/{}/records", self.base_url, zone)
    }

    fn txt_record_url(&self, zone: &str, name: &str) -> String {
        format!("{}/{}/TXT", self.records_url(zone), name)
    }

    /// Send one authenticated request and read the whole response body
    async fn send(&self, builder: reqwest::RequestBuilder, operation: &str) -> Result<(u16, String)> {
        let request = builder
            .bearer_auth(&self.api_key)
            .build()
            .map_err(|e| Error::config(format!("Invalid {} request: {}", operation, e)))?;

        let url = request.url().to_string();
        let body = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(|b| String::from_utf8_lossy(b).into_owned());
        self.exchange_logger.on_request(&RequestSnapshot::new(
            request.method().as_str(),
            url.clone(),
            request
                .headers()
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("<binary>").to_string())),
            body,
        ));

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| Error::transport(format!("{} request failed", operation), e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("{} response could not be read", operation), e))?;

        self.exchange_logger.on_response(&ResponseSnapshot {
            url,
            status,
            body: text.clone(),
        });

        Ok((status, text))
    }

    /// Search TXT records by name; `None` when the provider answers 404
    async fn search(&self, zone: &str, name: &str) -> Result<Option<RecordPage>> {
        tracing::debug!("Searching TXT records: {} in zone {}", name, zone);

        let builder = self
            .client
            .get(self.records_url(zone))
            .query(&[("name", name), ("type", "TXT")]);
        let (status, body) = self.send(builder, OP_SEARCH).await?;

        match status {
            404 => Ok(None),
            200 => {
                let response: SearchResponse = serde_json::from_str(&body).map_err(|e| {
                    Error::parse(format!("failed to parse search response: {}", e))
                })?;
                Ok(Some(response.data))
            }
            _ => Err(Error::provider_api(OP_SEARCH, status, body)),
        }
    }

    /// TXT records at `name` in `zone`
    ///
    /// An empty list when the provider reports "not found".
    pub async fn find_txt_records(&self, zone: &str, name: &str) -> Result<Vec<DnsRecord>> {
        Ok(self
            .search(zone, name)
            .await?
            .map(|page| page.results)
            .unwrap_or_default())
    }

    /// Whether at least one TXT record exists at `name` in `zone`
    ///
    /// "Not found" is `Ok(false)`, not an error.
    pub async fn record_exists(&self, zone: &str, name: &str) -> Result<bool> {
        Ok(self
            .search(zone, name)
            .await?
            .is_some_and(|page| page.total > 0))
    }

    /// Create a TXT record
    ///
    /// Not idempotent: the API may accept a second identical record or reject
    /// it, depending on provider behavior. Use
    /// [`ensure_txt_record`](Self::ensure_txt_record) when retries are
    /// possible.
    pub async fn create_txt_record(&self, zone: &str, name: &str, value: &str, ttl: u32) -> Result<()> {
        let payload = CreateRecordRequest {
            name,
            record_type: RecordType::Txt,
            data: value,
            ttl: Some(ttl),
            comment: Some(RECORD_COMMENT),
        };

        let builder = self.client.post(self.records_url(zone)).json(&payload);
        let (status, body) = self.send(builder, OP_CREATE).await?;

        match status {
            200 | 201 => {
                tracing::info!("TXT record created: {} in zone {}", name, zone);
                Ok(())
            }
            _ => Err(Error::provider_api(OP_CREATE, status, body)),
        }
    }

    /// Replace the data of the TXT record at `name`
    ///
    /// Addresses the record by name and type, not by the provider-assigned
    /// id returned from search. If the API only accepts id-based updates this
    /// call fails with the provider's status and body.
    pub async fn update_txt_record(&self, zone: &str, name: &str, value: &str, ttl: u32) -> Result<()> {
        let payload = UpdateRecordRequest {
            data: value,
            ttl: Some(ttl),
            comment: Some(RECORD_COMMENT),
        };

        let builder = self.client.put(self.txt_record_url(zone, name)).json(&payload);
        let (status, body) = self.send(builder, OP_UPDATE).await?;

        match status {
            200 | 201 => {
                tracing::info!("TXT record updated: {} in zone {}", name, zone);
                Ok(())
            }
            _ => Err(Error::provider_api(OP_UPDATE, status, body)),
        }
    }

    /// Delete the TXT records at `name`
    pub async fn delete_txt_record(&self, zone: &str, name: &str) -> Result<()> {
        let builder = self.client.delete(self.txt_record_url(zone, name));
        let (status, body) = self.send(builder, OP_DELETE).await?;

        match status {
            200 | 204 => {
                tracing::info!("TXT record deleted: {} in zone {}", name, zone);
                Ok(())
            }
            _ => Err(Error::provider_api(OP_DELETE, status, body)),
        }
    }

    /// Create the TXT record unless one with the same value already exists
    ///
    /// Returns `true` when a record was created. A failed create after a
    /// successful search is returned as-is; nothing is rolled back.
    pub async fn ensure_txt_record(&self, zone: &str, name: &str, value: &str, ttl: u32) -> Result<bool> {
        let existing = self.find_txt_records(zone, name).await?;
        if existing.iter().any(|r| r.is_txt_with(value)) {
            tracing::info!("TXT record already present: {} in zone {}", name, zone);
            return Ok(false);
        }

        if !existing.is_empty() {
            tracing::debug!(
                "{} other TXT record(s) at {} in zone {}; adding ours alongside",
                existing.len(),
                name,
                zone
            );
        }

        self.create_txt_record(zone, name, value, ttl).await?;
        Ok(true)
    }

    /// Delete the TXT records at `name` if there are any
    ///
    /// Returns `true` when a delete was issued.
    pub async fn remove_txt_record(&self, zone: &str, name: &str) -> Result<bool> {
        if !self.record_exists(zone, name).await? {
            tracing::info!("No TXT record to delete: {} in zone {}", name, zone);
            return Ok(false);
        }

        self.delete_txt_record(zone, name).await?;
        Ok(true)
    }
}
