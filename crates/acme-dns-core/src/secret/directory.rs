// # Directory Secret Store
//
// Directory-backed implementation of SecretStore.
//
// ## Layout
//
// One directory per secret, one file per key, the same shape as a mounted
// Kubernetes secret volume:
//
// ```text
// <root>/
//   default/
//     nameshield-credentials/
//       api-key
//   cert-manager/
//     nameshield-credentials/
//       api-key
// ```
//
// Entries whose name starts with `.` are skipped; projected volumes keep
// their `..data` symlinks and timestamped directories there.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::traits::secret_store::{SecretData, SecretStore};

/// Secret store reading from a directory tree
///
/// Nothing is cached: every lookup reads the files again, so rotated
/// credentials are picked up on the next challenge.
///
/// # Example
///
/// ```rust,no_run
/// use acme_dns_core::secret::DirectorySecretStore;
/// use acme_dns_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = DirectorySecretStore::new("/var/run/secrets/acme-dns");
///     let secret = store.get_secret("default", "nameshield-credentials").await?;
///     println!("found: {}", secret.is_some());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySecretStore {
    root: PathBuf,
}

impl DirectorySecretStore {
    /// Create a store rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one secret
    fn secret_dir(&self, namespace: &str, name: &str) -> Result<PathBuf, Error> {
        validate_component("namespace", namespace)?;
        validate_component("secret name", name)?;
        Ok(self.root.join(namespace).join(name))
    }
}

/// Reject anything that could escape the store root
fn validate_component(what: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::config(format!("{} cannot be empty", what)));
    }
    if value == "." || value == ".." || value.contains('/') || value.contains('\\') {
        return Err(Error::config(format!(
            "{} '{}' is not a valid path component",
            what, value
        )));
    }
    Ok(())
}

#[async_trait]
impl SecretStore for DirectorySecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<SecretData>, Error> {
        let dir = self.secret_dir(namespace, name)?;

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Secret directory does not exist: {}", dir.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::secret_store(format!(
                    "Failed to read secret directory {}: {}",
                    dir.display(),
                    e
                )));
            }
        };

        let mut data = SecretData::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            Error::secret_store(format!(
                "Failed to list secret directory {}: {}",
                dir.display(),
                e
            ))
        })? {
            let file_name = entry.file_name();
            let Some(key) = file_name.to_str() else {
                continue;
            };
            if key.starts_with('.') {
                continue;
            }

            // Follows symlinks, so projected-volume entries resolve to files
            let path = entry.path();
            let metadata = fs::metadata(&path).await.map_err(|e| {
                Error::secret_store(format!("Failed to stat {}: {}", path.display(), e))
            })?;
            if !metadata.is_file() {
                continue;
            }

            let value = fs::read(&path).await.map_err(|e| {
                Error::secret_store(format!("Failed to read {}: {}", path.display(), e))
            })?;
            data.insert(key.to_string(), value);
        }

        tracing::debug!(
            "Loaded secret {}/{} ({} keys)",
            namespace,
            name,
            data.len()
        );
        Ok(Some(data))
    }
}
