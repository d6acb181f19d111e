// # acme-dns-core
//
// Core library for the ACME DNS-01 challenge solver.
//
// ## Architecture Overview
//
// - **resolver**: Maps a challenge FQDN to the (zone, record name) pair a
//   provider API addresses
// - **Solver**: Trait for the Initialize/Present/CleanUp plugin contract
// - **SecretStore**: Trait for credential lookup, with memory and directory
//   backends
// - **ExchangeLogger**: Redaction-aware hook for HTTP diagnostics
// - **SolverRegistry**: Explicit name → solver map for host dispatch
//
// ## Design Principles
//
// 1. **Pure resolution**: Name resolution is string logic, testable alone
// 2. **Provider isolation**: Provider crates own their HTTP clients
// 3. **No hidden retries**: Every failure goes straight back to the host
// 4. **No global state**: Configuration is passed in, never read from the
//    environment
// 5. **Secrets stay secret**: Credentials never reach logs or Debug output

pub mod traits;
pub mod resolver;
pub mod registry;
pub mod config;
pub mod error;
pub mod secret;

// Re-export core types for convenience
pub use traits::{ChallengeAction, ChallengeRequest, ExchangeLogger, SecretStore, Solver};
pub use resolver::{ZoneRecordRef, resolve, resolve_in_zone, split_record_name, extract_zone};
pub use registry::SolverRegistry;
pub use config::{SecretKeySelector, SolverConfig, WebhookConfig};
pub use error::{Error, Result};
pub use secret::{DirectorySecretStore, MemorySecretStore};
