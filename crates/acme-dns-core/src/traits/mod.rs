//! Core traits for the ACME DNS solver
//!
//! - [`Solver`]: the Initialize/Present/CleanUp plugin contract
//! - [`SecretStore`]: credential lookup
//! - [`ExchangeLogger`]: redacted HTTP diagnostics hook

pub mod solver;
pub mod secret_store;
pub mod exchange_logger;

pub use solver::{Solver, ChallengeRequest, ChallengeAction};
pub use secret_store::{SecretStore, SecretData, resolve_secret_key};
pub use exchange_logger::{
    ExchangeLogger, NoopExchangeLogger, TracingExchangeLogger, RequestSnapshot, ResponseSnapshot,
};
