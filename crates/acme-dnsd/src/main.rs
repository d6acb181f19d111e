// # acme-dnsd - ACME DNS-01 Hook
//
// Runs a single Present or CleanUp step for one challenge and exits.
//
// This is a THIN integration layer ONLY:
// - DO NOT add DNS logic or retry logic here
// - All solver logic lives in acme-dns-core and the provider crates
// - Configuration is via environment variables and the action argument ONLY
//
// The binary is responsible for:
// 1. Reading configuration from the environment
// 2. Initializing logging and the runtime
// 3. Registering solvers and initializing them with the secret store
// 4. Dispatching the challenge to the configured solver
//
// ## Configuration
//
// ### Process
// - `GROUP_NAME`: API group the solver is served under (required)
// - `ACME_DNS_SOLVER`: Solver name (default: nameshield)
// - `ACME_DNS_SECRETS_DIR`: Secret store root, laid out as
//   `<dir>/<namespace>/<secret>/<key>` (default: /var/run/secrets/acme-dns)
// - `ACME_DNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `ACME_DNS_DEBUG_HTTP`: Log redacted HTTP exchanges at debug level
//
// ### Challenge
// - `ACME_DNS_FQDN`: Resolved challenge FQDN (required)
// - `ACME_DNS_KEY`: TXT record value (required for present)
// - `ACME_DNS_NAMESPACE`: Namespace the credential secret lives in (default: default)
// - `ACME_DNS_CONFIG`: Solver config as JSON
//
// ## Example
//
// ```bash
// export GROUP_NAME=acme.example.com
// export ACME_DNS_FQDN=_acme-challenge.www.example.com.
// export ACME_DNS_KEY=8Zq3...
// export ACME_DNS_CONFIG='{"apiKeySecretRef":{"name":"nameshield","key":"api-key"},"zone":"example.com"}'
//
// acme-dnsd present
// acme-dnsd cleanup
// ```

use acme_dns_core::traits::{ChallengeAction, ChallengeRequest, ExchangeLogger, TracingExchangeLogger};
use acme_dns_core::{DirectorySecretStore, SolverRegistry, WebhookConfig};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Challenge step completed
/// - 1: Configuration or startup error
/// - 2: Runtime error (provider, network, secret store)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HookExitCode {
    /// Challenge step completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    webhook: WebhookConfig,
    challenge: ChallengeRequest,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env(action: Option<String>) -> Result<Self> {
        Self::from_lookup(action, |key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    fn from_lookup<F>(action: Option<String>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(action) = action else {
            anyhow::bail!("Missing action. Usage: acme-dnsd <present|cleanup>");
        };
        let action: ChallengeAction = action
            .parse()
            .map_err(|e| anyhow::anyhow!("{}. Usage: acme-dnsd <present|cleanup>", e))?;

        let group_name = lookup("GROUP_NAME").unwrap_or_default();
        if group_name.is_empty() {
            anyhow::bail!(
                "GROUP_NAME must be specified. \
                Set it via: export GROUP_NAME=acme.example.com"
            );
        }

        let mut webhook = WebhookConfig::new(group_name);
        if let Some(solver) = lookup("ACME_DNS_SOLVER") {
            webhook.solver_name = solver;
        }
        if let Some(dir) = lookup("ACME_DNS_SECRETS_DIR") {
            webhook.secrets_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("ACME_DNS_LOG_LEVEL") {
            webhook.log_level = level;
        }
        if let Some(debug_http) = lookup("ACME_DNS_DEBUG_HTTP") {
            webhook.debug_http = parse_bool("ACME_DNS_DEBUG_HTTP", &debug_http)?;
        }

        let fqdn = lookup("ACME_DNS_FQDN").unwrap_or_default();
        let key = lookup("ACME_DNS_KEY").unwrap_or_default();
        let namespace = lookup("ACME_DNS_NAMESPACE").unwrap_or_else(|| "default".to_string());

        let mut challenge = ChallengeRequest::new(action, fqdn, key).with_namespace(namespace);
        if let Some(raw) = lookup("ACME_DNS_CONFIG") {
            let config: serde_json::Value = serde_json::from_str(&raw)
                .context("ACME_DNS_CONFIG is not valid JSON")?;
            challenge = challenge.with_config(config);
        }

        Ok(Self { webhook, challenge })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.webhook.validate()?;

        if self.challenge.resolved_fqdn.trim_end_matches('.').is_empty() {
            anyhow::bail!(
                "ACME_DNS_FQDN is required. \
                Set it via: export ACME_DNS_FQDN=_acme-challenge.example.com."
            );
        }

        if self.challenge.action == ChallengeAction::Present && self.challenge.key.is_empty() {
            anyhow::bail!("ACME_DNS_KEY is required for present");
        }

        if self.challenge.resource_namespace.is_empty() {
            anyhow::bail!("ACME_DNS_NAMESPACE cannot be empty");
        }

        if self.challenge.config.is_none() {
            warn!("ACME_DNS_CONFIG is not set; the solver will reject the challenge");
        }

        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("{} must be a boolean (true/false). Got: {}", name, other),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env(env::args().nth(1)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return HookExitCode::ConfigError.into();
        }
    };

    // Initialize tracing
    let log_level = match config.webhook.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HookExitCode::ConfigError.into();
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation error: {:#}", e);
        return HookExitCode::ConfigError.into();
    }

    info!(
        "Starting acme-dnsd: {} {} (group {})",
        config.challenge.action, config.challenge.resolved_fqdn, config.webhook.group_name
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HookExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(config)).into()
}

/// Register solvers, initialize them and run the challenge step
async fn run(config: Config) -> HookExitCode {
    let registry = SolverRegistry::new();
    if let Err(e) = register_solvers(&registry, &config.webhook) {
        error!("Failed to register solvers: {}", e);
        return HookExitCode::ConfigError;
    }

    let solver = match registry.get(&config.webhook.solver_name) {
        Ok(solver) => solver,
        Err(e) => {
            error!("{}. Registered solvers: {:?}", e, registry.list());
            return HookExitCode::ConfigError;
        }
    };

    let secrets = Arc::new(DirectorySecretStore::new(&config.webhook.secrets_dir));
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(forward_shutdown(stop_tx));

    if let Err(e) = registry.initialize_all(secrets, stop_rx).await {
        error!("Failed to initialize solvers: {}", e);
        return HookExitCode::ConfigError;
    }

    match solver.handle(&config.challenge).await {
        Ok(()) => {
            info!(
                "{} for {} completed",
                config.challenge.action, config.challenge.resolved_fqdn
            );
            HookExitCode::Success
        }
        Err(e) => {
            error!(
                "{} for {} failed: {}",
                config.challenge.action, config.challenge.resolved_fqdn, e
            );
            exit_code_for(&e)
        }
    }
}

/// Misconfiguration is not worth retrying; everything else may be
fn exit_code_for(err: &acme_dns_core::Error) -> HookExitCode {
    match err {
        acme_dns_core::Error::Config(_) => HookExitCode::ConfigError,
        _ => HookExitCode::RuntimeError,
    }
}

/// Register every solver compiled into this binary
fn register_solvers(registry: &SolverRegistry, webhook: &WebhookConfig) -> Result<()> {
    let exchange_logger: Option<Arc<dyn ExchangeLogger>> = if webhook.debug_http {
        Some(Arc::new(TracingExchangeLogger))
    } else {
        None
    };

    #[cfg(feature = "nameshield")]
    {
        info!("Registering NameShield solver");
        acme_dns_provider_nameshield::register(registry, exchange_logger.clone())?;
    }

    #[cfg(not(feature = "nameshield"))]
    {
        let _ = (registry, exchange_logger);
    }

    Ok(())
}

/// Flip the stop signal when the process is asked to terminate
///
/// In-flight provider calls finish; solvers refuse any new work.
async fn forward_shutdown(stop: watch::Sender<bool>) {
    match wait_for_shutdown().await {
        Ok(signal) => {
            info!("Received shutdown signal: {}", signal);
            let _ = stop.send(true);
        }
        Err(e) => warn!("Shutdown signal handling unavailable: {}", e),
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
