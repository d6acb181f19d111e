//! Test doubles and common utilities for contract tests
//!
//! Minimal doubles that record how the host-facing contract is exercised
//! without talking to any provider.

#![allow(dead_code)]

use acme_dns_core::error::{Error, Result};
use acme_dns_core::traits::{ChallengeRequest, SecretData, SecretStore, Solver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// A solver that records every call it receives
pub struct RecordingSolver {
    name: &'static str,
    initialize_call_count: Arc<AtomicUsize>,
    presented: Arc<Mutex<Vec<String>>>,
    cleaned_up: Arc<Mutex<Vec<String>>>,
}

impl RecordingSolver {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            initialize_call_count: Arc::new(AtomicUsize::new(0)),
            presented: Arc::new(Mutex::new(Vec::new())),
            cleaned_up: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times initialize() was called
    pub fn initialize_call_count(&self) -> usize {
        self.initialize_call_count.load(Ordering::SeqCst)
    }

    /// FQDNs passed to present(), in order
    pub fn presented(&self) -> Vec<String> {
        self.presented.lock().unwrap().clone()
    }

    /// FQDNs passed to cleanup(), in order
    pub fn cleaned_up(&self) -> Vec<String> {
        self.cleaned_up.lock().unwrap().clone()
    }

    /// Create a solver that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            name: other.name,
            initialize_call_count: Arc::clone(&other.initialize_call_count),
            presented: Arc::clone(&other.presented),
            cleaned_up: Arc::clone(&other.cleaned_up),
        }
    }
}

#[async_trait::async_trait]
impl Solver for RecordingSolver {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(
        &self,
        _secrets: Arc<dyn SecretStore>,
        _stop: watch::Receiver<bool>,
    ) -> Result<()> {
        self.initialize_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn present(&self, challenge: &ChallengeRequest) -> Result<()> {
        self.presented
            .lock()
            .unwrap()
            .push(challenge.resolved_fqdn.clone());
        Ok(())
    }

    async fn cleanup(&self, challenge: &ChallengeRequest) -> Result<()> {
        self.cleaned_up
            .lock()
            .unwrap()
            .push(challenge.resolved_fqdn.clone());
        Ok(())
    }
}

/// A secret store whose backend is always down
pub struct UnavailableSecretStore;

#[async_trait::async_trait]
impl SecretStore for UnavailableSecretStore {
    async fn get_secret(&self, _namespace: &str, _name: &str) -> Result<Option<SecretData>> {
        Err(Error::secret_store("backend unavailable"))
    }
}

/// A stop channel that never fires
pub fn idle_stop() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    // Keep the sender alive for the rest of the test process
    std::mem::forget(tx);
    rx
}
