//! NameShield implementation of the [`Solver`] contract

use acme_dns_core::resolver::{self, ZoneRecordRef};
use acme_dns_core::traits::{
    ChallengeRequest, ExchangeLogger, NoopExchangeLogger, SecretStore, Solver, resolve_secret_key,
};
use acme_dns_core::{Error, Result, SolverConfig};
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;

use crate::client::{NAMESHIELD_API_BASE, NAMESHIELD_OTE_API_BASE, NameShieldClient, build_http_client};

/// Name the solver is referenced by in issuer configuration
pub const SOLVER_NAME: &str = "nameshield";

/// DNS-01 solver backed by the NameShield DNS API
///
/// Credentials come from the secret named in each challenge's config, so one
/// solver serves any number of issuers. After [`initialize`](Solver::initialize)
/// the solver only holds write-once state and is safe to share across tasks.
pub struct NameShieldSolver {
    http: reqwest::Client,
    secrets: OnceLock<Arc<dyn SecretStore>>,
    stop: OnceLock<watch::Receiver<bool>>,
    exchange_logger: Arc<dyn ExchangeLogger>,
}

impl std::fmt::Debug for NameShieldSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameShieldSolver")
            .field("initialized", &self.secrets.get().is_some())
            .finish()
    }
}

impl NameShieldSolver {
    /// Create an uninitialized solver
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: build_http_client()?,
            secrets: OnceLock::new(),
            stop: OnceLock::new(),
            exchange_logger: Arc::new(NoopExchangeLogger),
        })
    }

    /// Hand every HTTP exchange to `logger`
    pub fn with_exchange_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.exchange_logger = logger;
        self
    }

    fn is_stopping(&self) -> bool {
        self.stop.get().is_some_and(|rx| *rx.borrow())
    }

    /// Decode config, resolve the credential and the record for a challenge
    async fn prepare(
        &self,
        challenge: &ChallengeRequest,
    ) -> Result<(NameShieldClient, ZoneRecordRef, SolverConfig)> {
        if self.is_stopping() {
            return Err(Error::ShuttingDown);
        }

        let secrets = self
            .secrets
            .get()
            .ok_or_else(|| Error::config("nameshield solver used before initialize"))?;

        let config = SolverConfig::from_json(challenge.config.as_ref())?;
        config.validate()?;

        let api_key = resolve_secret_key(
            secrets.as_ref(),
            &challenge.resource_namespace,
            &config.api_key_secret_ref,
        )
        .await?;

        let base_url = match (&config.base_url, config.sandbox) {
            (Some(url), _) => url.as_str(),
            (None, true) => NAMESHIELD_OTE_API_BASE,
            (None, false) => NAMESHIELD_API_BASE,
        };

        let client = NameShieldClient::with_http_client(api_key, base_url, self.http.clone())?
            .with_exchange_logger(self.exchange_logger.clone());

        let record = record_for(&challenge.resolved_fqdn, config.zone.as_deref())?;

        Ok((client, record, config))
    }
}

/// Resolve the record a challenge is published at
///
/// With an explicit zone, a challenge outside that zone is a configuration
/// error rather than a record named after the whole FQDN.
fn record_for(fqdn: &str, zone: Option<&str>) -> Result<ZoneRecordRef> {
    let Some(zone) = zone else {
        return Ok(resolver::resolve(fqdn));
    };

    let record = resolver::resolve_in_zone(fqdn, zone);
    let normalized = fqdn.strip_suffix('.').unwrap_or(fqdn);
    if !normalized.ends_with(&format!(".{}", record.zone)) {
        return Err(Error::config(format!(
            "challenge {} is not inside zone {}",
            fqdn, record.zone
        )));
    }
    Ok(record)
}

#[async_trait]
impl Solver for NameShieldSolver {
    fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    async fn initialize(
        &self,
        secrets: Arc<dyn SecretStore>,
        stop: watch::Receiver<bool>,
    ) -> Result<()> {
        self.secrets
            .set(secrets)
            .map_err(|_| Error::config("nameshield solver is already initialized"))?;
        // Set together with `secrets`, so this cannot already be filled
        let _ = self.stop.set(stop);

        tracing::info!("NameShield solver initialized");
        Ok(())
    }

    async fn present(&self, challenge: &ChallengeRequest) -> Result<()> {
        let (client, record, config) = self.prepare(challenge).await?;

        tracing::info!(
            "Presenting challenge {} as {}",
            challenge.resolved_fqdn,
            record
        );

        let created = client
            .ensure_txt_record(&record.zone, &record.record_name, &challenge.key, config.ttl())
            .await?;
        if !created {
            tracing::info!("Challenge {} was already presented", challenge.resolved_fqdn);
        }
        Ok(())
    }

    async fn cleanup(&self, challenge: &ChallengeRequest) -> Result<()> {
        let (client, record, _) = self.prepare(challenge).await?;

        tracing::info!(
            "Cleaning up challenge {} at {}",
            challenge.resolved_fqdn,
            record
        );

        let deleted = client
            .remove_txt_record(&record.zone, &record.record_name)
            .await?;
        if !deleted {
            tracing::warn!(
                "Challenge {} had no record left to clean up",
                challenge.resolved_fqdn
            );
        }
        Ok(())
    }
}
