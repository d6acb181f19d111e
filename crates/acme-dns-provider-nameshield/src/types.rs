//! NameShield DNS API v2 wire types

use serde::{Deserialize, Deserializer, Serialize};

/// DNS record type as reported by the API
///
/// Only TXT is ever written; the other variants exist so search results for
/// a name can be decoded whatever the provider returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Srv,
    Caa,
    Txt,
    #[serde(other)]
    Other,
}

/// A record as stored at the provider
///
/// The provider is the source of truth; these values are never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned id
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

impl DnsRecord {
    /// Whether this is a TXT record carrying `value`
    ///
    /// The API may return TXT data wrapped in double quotes.
    pub fn is_txt_with(&self, value: &str) -> bool {
        self.record_type == RecordType::Txt && self.data.trim_matches('"') == value
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordPage {
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub results: Vec<DnsRecord>,
}

/// Envelope of `GET /zones/{zone}/records`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub message: String,
    pub data: RecordPage,
}

/// Body of `POST /zones/{zone}/records`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateRecordRequest<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub data: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
}

/// Body of `PUT /zones/{zone}/records/{name}/TXT`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateRecordRequest<'a> {
    pub data: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}
