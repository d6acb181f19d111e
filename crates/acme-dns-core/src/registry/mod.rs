//! Solver registry
//!
//! Maps solver names (as referenced from issuer configuration) to solver
//! instances, so the host can dispatch a challenge without a hardcoded
//! if-else chain. The registry is an ordinary value owned by the composition
//! root; there is no global registration state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use acme_dns_core::registry::SolverRegistry;
//!
//! let registry = SolverRegistry::new();
//! acme_dns_provider_nameshield::register(&registry, None)?;
//!
//! registry.initialize_all(secrets, stop_rx).await?;
//!
//! let solver = registry.get("nameshield")?;
//! solver.handle(&challenge).await?;
//! ```

use crate::error::{Error, Result};
use crate::traits::{SecretStore, Solver};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Registry of named solvers
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// lookups and exclusive registration.
#[derive(Default)]
pub struct SolverRegistry {
    solvers: RwLock<HashMap<String, Arc<dyn Solver>>>,
}

impl SolverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a solver under its own name
    ///
    /// Registering a second solver with the same name replaces the first.
    pub fn register(&self, solver: Arc<dyn Solver>) -> Result<()> {
        let name = solver.name().to_string();
        let mut solvers = self
            .solvers
            .write()
            .map_err(|_| Error::Other("solver registry lock poisoned".to_string()))?;
        if solvers.insert(name.clone(), solver).is_some() {
            tracing::warn!("Solver '{}' registered twice; keeping the latest", name);
        }
        Ok(())
    }

    /// Look up a solver by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn Solver>> {
        let solvers = self
            .solvers
            .read()
            .map_err(|_| Error::Other("solver registry lock poisoned".to_string()))?;
        solvers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown solver: {}", name)))
    }

    /// Initialize every registered solver with the same secret store
    ///
    /// Stops at the first failure.
    pub async fn initialize_all(
        &self,
        secrets: Arc<dyn SecretStore>,
        stop: watch::Receiver<bool>,
    ) -> Result<()> {
        // Collect first so the lock is not held across await points
        let solvers: Vec<Arc<dyn Solver>> = {
            let guard = self
                .solvers
                .read()
                .map_err(|_| Error::Other("solver registry lock poisoned".to_string()))?;
            guard.values().cloned().collect()
        };

        for solver in solvers {
            tracing::info!("Initializing solver: {}", solver.name());
            solver.initialize(secrets.clone(), stop.clone()).await?;
        }
        Ok(())
    }

    /// List all registered solver names
    pub fn list(&self) -> Vec<String> {
        self.solvers
            .read()
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Check if a solver is registered
    pub fn has(&self, name: &str) -> bool {
        self.solvers
            .read()
            .map(|s| s.contains_key(name))
            .unwrap_or(false)
    }
}
