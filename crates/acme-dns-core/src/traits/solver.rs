// # Solver Trait
//
// Defines the three-operation plugin contract a host framework drives to
// solve DNS-01 challenges.
//
// ## Implementations
//
// - NameShield: `acme-dns-provider-nameshield` crate
//
// ## Usage
//
// ```rust,ignore
// use acme_dns_core::{ChallengeRequest, MemorySecretStore, Solver};
// use std::sync::Arc;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let solver = /* Solver implementation */;
//     let (_stop_tx, stop_rx) = tokio::sync::watch::channel(false);
//
//     solver.initialize(Arc::new(MemorySecretStore::new()), stop_rx).await?;
//
//     let challenge = ChallengeRequest::present("_acme-challenge.example.com.", "token");
//     solver.present(&challenge).await?;
//     solver.cleanup(&challenge.into_cleanup()).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use crate::traits::SecretStore;

/// What the host is asking a solver to do with a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeAction {
    /// Publish the TXT record
    Present,
    /// Remove the TXT record
    CleanUp,
}

impl std::fmt::Display for ChallengeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChallengeAction::Present => write!(f, "present"),
            ChallengeAction::CleanUp => write!(f, "cleanup"),
        }
    }
}

impl std::str::FromStr for ChallengeAction {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "present" => Ok(ChallengeAction::Present),
            "cleanup" | "clean-up" | "clean_up" => Ok(ChallengeAction::CleanUp),
            other => Err(crate::Error::config(format!(
                "unknown challenge action '{}'. Supported: present, cleanup",
                other
            ))),
        }
    }
}

/// A DNS-01 challenge as handed over by the host
///
/// Immutable and owned by the host; solvers only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Requested action
    pub action: ChallengeAction,

    /// Name the certificate is being issued for (informational)
    #[serde(default)]
    pub dns_name: String,

    /// Fully-qualified name of the TXT record, trailing dot optional
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// TXT record payload
    pub key: String,

    /// Namespace secrets referenced by `config` are looked up in
    #[serde(default)]
    pub resource_namespace: String,

    /// Whether the issuer allows credentials from the ambient environment
    #[serde(default)]
    pub allow_ambient_credentials: bool,

    /// Opaque provider configuration, decoded by the solver
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

impl ChallengeRequest {
    /// Create a request with the given action
    pub fn new(
        action: ChallengeAction,
        resolved_fqdn: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            action,
            dns_name: String::new(),
            resolved_fqdn: resolved_fqdn.into(),
            key: key.into(),
            resource_namespace: String::new(),
            allow_ambient_credentials: false,
            config: None,
        }
    }

    /// Create a present request
    pub fn present(resolved_fqdn: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(ChallengeAction::Present, resolved_fqdn, key)
    }

    /// Create a cleanup request
    pub fn cleanup(resolved_fqdn: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(ChallengeAction::CleanUp, resolved_fqdn, key)
    }

    /// Set the resource namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.resource_namespace = namespace.into();
        self
    }

    /// Set the provider configuration
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the certificate DNS name
    pub fn with_dns_name(mut self, dns_name: impl Into<String>) -> Self {
        self.dns_name = dns_name.into();
        self
    }

    /// The same challenge, asking for cleanup
    pub fn into_cleanup(mut self) -> Self {
        self.action = ChallengeAction::CleanUp;
        self
    }
}

/// Trait for DNS-01 solver implementations
///
/// The host framework owns the challenge lifecycle and calls:
/// 1. [`initialize`](Solver::initialize) once at startup
/// 2. [`present`](Solver::present) to publish a record
/// 3. [`cleanup`](Solver::cleanup) to remove it again
///
/// # Thread Safety
///
/// The host may run `present`/`cleanup` for different challenges
/// concurrently. After `initialize` a solver must carry no shared mutable
/// state.
///
/// # Responsibilities
///
/// - ✅ Decode the challenge's provider config
/// - ✅ Resolve credentials through the secret store
/// - ✅ Issue a small, bounded number of provider API calls
/// - ❌ Retry or back off (owned by the host)
/// - ❌ Enforce present-before-cleanup ordering (owned by the host)
/// - ❌ Cache records or credentials between calls
#[async_trait]
pub trait Solver: Send + Sync {
    /// Name the solver is referenced by in issuer configuration
    fn name(&self) -> &'static str;

    /// One-time setup
    ///
    /// # Parameters
    ///
    /// - `secrets`: secret store used to resolve API credentials
    /// - `stop`: flips to `true` when the host shuts down; not wired into
    ///   in-flight requests
    async fn initialize(
        &self,
        secrets: Arc<dyn SecretStore>,
        stop: watch::Receiver<bool>,
    ) -> Result<(), crate::Error>;

    /// Publish the challenge TXT record
    ///
    /// Must tolerate the record already existing.
    async fn present(&self, challenge: &ChallengeRequest) -> Result<(), crate::Error>;

    /// Remove the challenge TXT record
    async fn cleanup(&self, challenge: &ChallengeRequest) -> Result<(), crate::Error>;

    /// Dispatch on the challenge's action
    async fn handle(&self, challenge: &ChallengeRequest) -> Result<(), crate::Error> {
        match challenge.action {
            ChallengeAction::Present => self.present(challenge).await,
            ChallengeAction::CleanUp => self.cleanup(challenge).await,
        }
    }
}
