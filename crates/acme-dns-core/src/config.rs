//! Configuration types for the ACME DNS solver
//!
//! Two layers:
//! - [`SolverConfig`]: per-issuer provider config, decoded from the opaque JSON
//!   blob attached to every challenge
//! - [`WebhookConfig`]: process-level settings, built once by the composition
//!   root and passed in explicitly

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default TTL for challenge TXT records (in seconds)
pub const DEFAULT_TTL: u32 = 300;

/// Reference to one key inside a named secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKeySelector {
    /// Secret name, looked up in the challenge's resource namespace
    #[serde(default)]
    pub name: String,
    /// Key within the secret's data
    #[serde(default)]
    pub key: String,
}

/// Provider configuration attached to a challenge request
///
/// Wire format (camelCase):
///
/// ```json
/// {
///   "apiKeySecretRef": { "name": "nameshield-credentials", "key": "api-key" },
///   "ttl": 300,
///   "sandbox": false,
///   "zone": "example.com"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Where the API key lives
    #[serde(default)]
    pub api_key_secret_ref: SecretKeySelector,

    /// TTL for created records
    #[serde(default)]
    pub ttl: Option<u32>,

    /// Use the provider's test environment
    #[serde(default)]
    pub sandbox: bool,

    /// Explicit API endpoint (overrides `sandbox`)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Apex zone hosted at the provider
    ///
    /// When set, record names are split against this zone instead of taking
    /// everything after the challenge label as the zone.
    #[serde(default)]
    pub zone: Option<String>,
}

impl SolverConfig {
    /// Decode the config blob of a challenge
    ///
    /// A missing blob decodes to the default config, which then fails
    /// [`validate`](Self::validate).
    pub fn from_json(value: Option<&serde_json::Value>) -> Result<Self, crate::Error> {
        let Some(value) = value else {
            return Ok(Self::default());
        };

        if value.is_null() {
            return Ok(Self::default());
        }

        serde_json::from_value(value.clone())
            .map_err(|e| crate::Error::config(format!("error decoding solver config: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key_secret_ref.name.is_empty() {
            return Err(crate::Error::config("apiKeySecretRef.name is required"));
        }
        if self.api_key_secret_ref.key.is_empty() {
            return Err(crate::Error::config("apiKeySecretRef.key is required"));
        }
        if self.ttl == Some(0) {
            return Err(crate::Error::config("ttl must be > 0"));
        }
        if let Some(ref url) = self.base_url
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "baseUrl must use HTTP or HTTPS scheme. Got: {}",
                url
            )));
        }
        if let Some(ref zone) = self.zone
            && zone.trim_end_matches('.').is_empty()
        {
            return Err(crate::Error::config("zone cannot be empty"));
        }
        Ok(())
    }

    /// TTL to use for created records
    pub fn ttl(&self) -> u32 {
        self.ttl.unwrap_or(DEFAULT_TTL)
    }
}

/// Process-level configuration for the solver host
///
/// Built once by the bootstrap. Library code never reads the process
/// environment; it receives this struct instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// API group the solvers are served under
    pub group_name: String,

    /// Solver to dispatch challenges to
    #[serde(default = "default_solver_name")]
    pub solver_name: String,

    /// Root of the directory-backed secret store
    #[serde(default = "default_secrets_dir")]
    pub secrets_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit redacted HTTP request/response dumps at debug level
    #[serde(default)]
    pub debug_http: bool,
}

impl WebhookConfig {
    /// Create a configuration with defaults for everything but the group name
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            solver_name: default_solver_name(),
            secrets_dir: default_secrets_dir(),
            log_level: default_log_level(),
            debug_http: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.group_name.is_empty() {
            return Err(crate::Error::config("group name must be specified"));
        }
        if self.solver_name.is_empty() {
            return Err(crate::Error::config("solver name cannot be empty"));
        }
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(crate::Error::config(format!(
                "log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                other
            ))),
        }
    }
}

fn default_solver_name() -> String {
    "nameshield".to_string()
}

fn default_secrets_dir() -> PathBuf {
    PathBuf::from("/var/run/secrets/acme-dns")
}

fn default_log_level() -> String {
    "info".to_string()
}
