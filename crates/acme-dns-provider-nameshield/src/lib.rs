// # NameShield DNS Provider
//
// This crate provides the NameShield DNS-01 solver for the ACME DNS system.
//
// ## Implementation Status
//
// - ✅ Search, create, update and delete of TXT records (DNS API v2)
// - ✅ Composed check-then-write operations so retried Present/CleanUp calls
//   do not pile up duplicate records
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Production and OTE (sandbox) endpoints, plus explicit endpoint override
// - ✅ Redacted HTTP exchange capture through `ExchangeLogger`
// - ❌ NO retry logic (owned by the host framework)
// - ❌ NO backoff or rate limiting (owned by the host framework)
// - ❌ NO caching of records or credentials
// - ❌ NO background tasks
//
// ## Security Requirements
//
// - API key NEVER appears in logs or Debug output
// - API key is read from the secret store on every challenge
// - Empty API keys are rejected before any request is made
//
// ## Known Limitations
//
// - `update_txt_record` addresses the record by name and type rather than by
//   the id returned from search
// - `delete_txt_record` removes every TXT record at the name, including ones
//   published for a concurrent challenge on the same name
//
// ## API Reference
//
// - NameShield DNS API v2: https://api.nameshield.net/dns/v2
// - Search records: GET `/zones/:zone/records?name=...&type=TXT`
// - Create record: POST `/zones/:zone/records`
// - Update record: PUT `/zones/:zone/records/:name/TXT`
// - Delete record: DELETE `/zones/:zone/records/:name/TXT`

pub mod client;
pub mod solver;
pub mod types;

pub use client::{
    DEFAULT_HTTP_TIMEOUT, NAMESHIELD_API_BASE, NAMESHIELD_OTE_API_BASE, NameShieldClient,
    build_http_client,
};
pub use solver::{NameShieldSolver, SOLVER_NAME};
pub use types::{DnsRecord, RecordPage, RecordType, SearchResponse};

use acme_dns_core::traits::ExchangeLogger;
use std::sync::Arc;

/// Register the NameShield solver with a registry
///
/// This function should be called during initialization to make the
/// NameShield solver available.
///
/// # Example
///
/// ```rust,no_run
/// use acme_dns_core::SolverRegistry;
///
/// let registry = SolverRegistry::new();
/// acme_dns_provider_nameshield::register(&registry, None).unwrap();
/// assert!(registry.has("nameshield"));
/// ```
pub fn register(
    registry: &acme_dns_core::SolverRegistry,
    exchange_logger: Option<Arc<dyn ExchangeLogger>>,
) -> acme_dns_core::Result<()> {
    let mut solver = NameShieldSolver::new()?;
    if let Some(logger) = exchange_logger {
        solver = solver.with_exchange_logger(logger);
    }
    registry.register(Arc::new(solver))
}
