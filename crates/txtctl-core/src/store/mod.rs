// # Credential Store Implementations
//
// This module provides implementations of the CredentialStore trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use crate::config::CredentialStoreConfig;
use crate::traits::CredentialStore;

/// Build a credential store from configuration
pub fn open(config: &CredentialStoreConfig) -> Result<Box<dyn CredentialStore>, crate::Error> {
    config.validate()?;

    match config {
        CredentialStoreConfig::File { path } => Ok(Box::new(FileCredentialStore::new(path))),
        CredentialStoreConfig::Memory => Ok(Box::new(MemoryCredentialStore::new())),
    }
}
