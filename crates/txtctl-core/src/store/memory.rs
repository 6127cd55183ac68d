// # Memory Credential Store
//
// In-memory implementation of CredentialStore. Nothing survives the process;
// useful for tests and for embedding txtctl-core in a host that supplies
// credentials itself.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::credential_store::{CredentialStore, Credentials};

/// In-memory credential store
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl MemoryCredentialStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds credentials
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(credentials))),
        }
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_none()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Credentials, Error> {
        let guard = self.inner.read().await;
        match guard.as_ref() {
            Some(credentials) if credentials.is_complete() => Ok(credentials.clone()),
            Some(_) => Err(Error::credentials_not_set(
                "stored credentials are incomplete",
            )),
            None => Err(Error::credentials_not_set("no credentials stored")),
        }
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        *guard = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        *guard = None;
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
