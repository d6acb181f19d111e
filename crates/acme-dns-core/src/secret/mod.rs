// # Secret Store Implementations
//
// This module provides implementations of the SecretStore trait for
// different backends.

pub mod directory;
pub mod memory;

pub use directory::DirectorySecretStore;
pub use memory::MemorySecretStore;
