// # Secret Store Trait
//
// Defines the interface solvers use to resolve API credentials referenced
// from a challenge's provider config.
//
// ## Implementations
//
// - In-memory: [`MemorySecretStore`](crate::secret::MemorySecretStore)
// - Directory-backed: [`DirectorySecretStore`](crate::secret::DirectorySecretStore)

use async_trait::async_trait;
use std::collections::HashMap;

use crate::config::SecretKeySelector;

/// Raw secret data, keyed by entry name
pub type SecretData = HashMap<String, Vec<u8>>;

/// Trait for secret store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Security
///
/// Implementations must never log secret values.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))`: the secret's entries
    /// - `Ok(None)`: no such secret
    /// - `Err(Error)`: backend failure
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<SecretData>, crate::Error>;
}

/// Resolve one secret entry as a UTF-8 string
///
/// A missing secret or key is a configuration error. Surrounding whitespace is
/// trimmed, since key files usually end with a newline.
pub async fn resolve_secret_key(
    store: &dyn SecretStore,
    namespace: &str,
    selector: &SecretKeySelector,
) -> Result<String, crate::Error> {
    let data = store
        .get_secret(namespace, &selector.name)
        .await?
        .ok_or_else(|| {
            crate::Error::config(format!(
                "secret {}/{} not found",
                namespace, selector.name
            ))
        })?;

    let raw = data.get(&selector.key).ok_or_else(|| {
        crate::Error::config(format!(
            "no key {} in secret {}/{}",
            selector.key, namespace, selector.name
        ))
    })?;

    let value = std::str::from_utf8(raw).map_err(|_| {
        crate::Error::config(format!(
            "key {} in secret {}/{} is not valid UTF-8",
            selector.key, namespace, selector.name
        ))
    })?;

    let value = value.trim();
    if value.is_empty() {
        return Err(crate::Error::config(format!(
            "key {} in secret {}/{} is empty",
            selector.key, namespace, selector.name
        )));
    }

    Ok(value.to_string())
}
