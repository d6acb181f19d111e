//! Error types for the ACME DNS solver
//!
//! Every failure is returned to the host as a terminal result for the current
//! Present/CleanUp call. Nothing in this crate retries.

use thiserror::Error;

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the ACME DNS solver
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed provider config, missing secret or secret key,
    /// solver used before initialization
    #[error("Configuration error: {0}")]
    Config(String),

    /// The secret store backend failed while reading a secret
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// Network failure or request timeout
    #[error("Transport error: {message}")]
    Transport {
        /// What was being attempted
        message: String,
        /// The underlying client error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider answered with a status outside the operation's success set
    #[error("{operation} failed: HTTP {status}: {body}")]
    ProviderApi {
        /// Operation name (e.g. "create TXT record")
        operation: String,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The provider answered with a body that does not match its contract
    #[error("Parse error: {0}")]
    Parse(String),

    /// The solver received its stop signal and refuses new work
    #[error("Solver is shutting down")]
    ShuttingDown,

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a secret store error
    pub fn secret_store(msg: impl Into<String>) -> Self {
        Self::SecretStore(msg.into())
    }

    /// Create a transport error wrapping the underlying client error
    pub fn transport(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a provider API error
    pub fn provider_api(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::ProviderApi {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// HTTP status carried by a provider API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ProviderApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a later attempt could succeed without operator action
    ///
    /// Transport failures, rate limiting (429) and provider-side 5xx are
    /// transient. Hosts that schedule retries can use this to pick a backoff;
    /// the solver itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::ProviderApi { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
