//! Process-local credential storage.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::entities::BearerToken;
use crate::domain::errors::CredentialError;
use crate::domain::ports::CredentialStoragePort;

/// Holds a token for the lifetime of the process, e.g. one passed on the
/// command line.
#[derive(Default)]
pub struct MemoryCredentialStorage {
    token: RwLock<Option<BearerToken>>,
}

impl MemoryCredentialStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage holding `token`.
    #[must_use]
    pub fn with_token(token: BearerToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

#[async_trait]
impl CredentialStoragePort for MemoryCredentialStorage {
    async fn get_token(&self) -> Result<Option<BearerToken>, CredentialError> {
        Ok(self.token.read().clone())
    }

    async fn store_token(&self, token: &BearerToken) -> Result<(), CredentialError> {
        *self.token.write() = Some(token.clone());
        Ok(())
    }

    async fn delete_token(&self) -> Result<(), CredentialError> {
        *self.token.write() = None;
        Ok(())
    }
}
