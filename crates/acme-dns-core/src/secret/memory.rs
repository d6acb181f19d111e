// # Memory Secret Store
//
// In-memory implementation of SecretStore.
//
// ## When to Use
//
// - Tests
// - Embedding the solver in a host that already holds credentials in memory

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::secret_store::{SecretData, SecretStore};

/// In-memory secret store
///
/// Secrets are keyed by `(namespace, name)`. Cloning shares the underlying
/// map.
///
/// # Example
///
/// ```rust,no_run
/// use acme_dns_core::secret::MemorySecretStore;
/// use acme_dns_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemorySecretStore::new();
///     store.insert_entry("default", "nameshield-credentials", "api-key", "s3cr3t").await;
///
///     let secret = store.get_secret("default", "nameshield-credentials").await?;
///     assert!(secret.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Default)]
pub struct MemorySecretStore {
    inner: Arc<RwLock<HashMap<(String, String), SecretData>>>,
}

// Debug lists secret coordinates only, never values
impl std::fmt::Debug for MemorySecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.inner.try_read().map(|g| g.len()).ok();
        f.debug_struct("MemorySecretStore")
            .field("secrets", &count)
            .finish()
    }
}

impl MemorySecretStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a whole secret
    pub async fn insert(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        data: SecretData,
    ) {
        let mut guard = self.inner.write().await;
        guard.insert((namespace.into(), name.into()), data);
    }

    /// Insert or replace a single entry of a secret
    pub async fn insert_entry(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Vec<u8>>,
    ) {
        let mut guard = self.inner.write().await;
        guard
            .entry((namespace.into(), name.into()))
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Remove a secret
    pub async fn remove(&self, namespace: &str, name: &str) -> Option<SecretData> {
        let mut guard = self.inner.write().await;
        guard.remove(&(namespace.to_string(), name.to_string()))
    }

    /// Get the number of secrets in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<SecretData>, Error> {
        let guard = self.inner.read().await;
        Ok(guard
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }
}
