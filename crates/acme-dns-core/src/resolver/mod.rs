//! Challenge FQDN resolution
//!
//! Maps the fully-qualified name of a DNS-01 challenge onto the pair the
//! provider API addresses records by: the zone and the label path relative to
//! that zone.
//!
//! ```text
//! _acme-challenge.example.com.      -> zone "example.com",     name "_acme-challenge"
//! _acme-challenge.sub.example.com   -> zone "sub.example.com", name "_acme-challenge"
//!   (split against "example.com")   -> zone "example.com",     name "_acme-challenge.sub"
//! ```
//!
//! Pure string logic: no network access, no provider knowledge.

use serde::{Deserialize, Serialize};

/// The label every DNS-01 challenge is published under
pub const CHALLENGE_LABEL: &str = "_acme-challenge";

const CHALLENGE_PREFIX: &str = "_acme-challenge.";

/// Zone and relative record name identifying one challenge record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneRecordRef {
    /// Apex of the zone the API call addresses, without trailing dot
    pub zone: String,
    /// Label path relative to `zone`
    pub record_name: String,
}

impl ZoneRecordRef {
    /// Rebuild the FQDN (without trailing dot) this reference points at
    pub fn fqdn(&self) -> String {
        if self.record_name == self.zone {
            return self.zone.clone();
        }
        format!("{}.{}", self.record_name, self.zone)
    }
}

impl std::fmt::Display for ZoneRecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (zone {})", self.record_name, self.zone)
    }
}

/// Strip exactly one trailing dot
fn normalize(fqdn: &str) -> &str {
    fqdn.strip_suffix('.').unwrap_or(fqdn)
}

/// Zone addressed by a challenge FQDN
///
/// Everything after the leading `_acme-challenge.` label; a name without that
/// label is treated as its own apex.
pub fn extract_zone(fqdn: &str) -> String {
    let fqdn = normalize(fqdn);
    fqdn.strip_prefix(CHALLENGE_PREFIX).unwrap_or(fqdn).to_string()
}

/// Record name of `fqdn` relative to `zone`
///
/// Falls back to the whole (normalized) FQDN when `zone` is not a suffix of it.
/// Only `fqdn` is normalized; `zone` is compared as given, matching what
/// [`extract_zone`] returns for the same name.
pub fn split_record_name(fqdn: &str, zone: &str) -> String {
    let fqdn = normalize(fqdn);

    if fqdn.strip_prefix(CHALLENGE_PREFIX) == Some(zone) {
        return CHALLENGE_LABEL.to_string();
    }

    if let Some(prefix) = fqdn.strip_suffix(zone)
        && let Some(name) = prefix.strip_suffix('.')
        && !name.is_empty()
    {
        return name.to_string();
    }

    fqdn.to_string()
}

/// Resolve a challenge FQDN into its zone and relative record name
pub fn resolve(fqdn: &str) -> ZoneRecordRef {
    let zone = extract_zone(fqdn);
    let record_name = split_record_name(fqdn, &zone);
    ZoneRecordRef { zone, record_name }
}

/// Resolve a challenge FQDN against a zone known to be hosted at the provider
///
/// Used when the certificate names a subdomain of the hosted zone, so that the
/// intermediate labels stay part of the record name.
pub fn resolve_in_zone(fqdn: &str, zone: &str) -> ZoneRecordRef {
    let zone = normalize(zone).to_string();
    let record_name = split_record_name(fqdn, &zone);
    ZoneRecordRef { zone, record_name }
}
