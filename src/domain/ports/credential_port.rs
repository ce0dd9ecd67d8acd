//! Credential cache port definition.

use async_trait::async_trait;

use crate::domain::entities::BearerToken;
use crate::domain::errors::CredentialError;

/// Port for the bearer credential cache.
#[async_trait]
pub trait CredentialStoragePort: Send + Sync {
    /// Retrieves the current token.
    async fn get_token(&self) -> Result<Option<BearerToken>, CredentialError>;

    /// Stores a token.
    async fn store_token(&self, token: &BearerToken) -> Result<(), CredentialError>;

    /// Deletes the stored token.
    async fn delete_token(&self) -> Result<(), CredentialError>;

    /// Checks if a token exists.
    async fn has_token(&self) -> Result<bool, CredentialError> {
        Ok(self.get_token().await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock credential storage for testing.
    pub struct MockCredentialStorage {
        token: Arc<RwLock<Option<BearerToken>>>,
        fail: bool,
    }

    impl MockCredentialStorage {
        /// Creates empty mock storage.
        pub fn new() -> Self {
            Self {
                token: Arc::new(RwLock::new(None)),
                fail: false,
            }
        }

        /// Creates mock storage with token.
        pub fn with_token(token: BearerToken) -> Self {
            Self {
                token: Arc::new(RwLock::new(Some(token))),
                fail: false,
            }
        }

        /// Creates mock storage whose reads always fail.
        pub fn failing() -> Self {
            Self {
                token: Arc::new(RwLock::new(None)),
                fail: true,
            }
        }
    }

    impl Default for MockCredentialStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl CredentialStoragePort for MockCredentialStorage {
        async fn get_token(&self) -> Result<Option<BearerToken>, CredentialError> {
            if self.fail {
                return Err(CredentialError::AccessFailed("locked".to_string()));
            }
            Ok(self.token.read().await.clone())
        }

        async fn store_token(&self, token: &BearerToken) -> Result<(), CredentialError> {
            *self.token.write().await = Some(token.clone());
            Ok(())
        }

        async fn delete_token(&self) -> Result<(), CredentialError> {
            *self.token.write().await = None;
            Ok(())
        }
    }
}
