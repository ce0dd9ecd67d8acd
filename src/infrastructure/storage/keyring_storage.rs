//! Keyring-based credential storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::domain::entities::BearerToken;
use crate::domain::errors::CredentialError;
use crate::domain::ports::CredentialStoragePort;

const KEYRING_SERVICE: &str = "gradeflow";
const KEYRING_USER: &str = "bearer-token";

/// Bearer token kept in the platform secret store.
///
/// Keyring backends block, so every call runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct KeyringCredentialStorage {
    service: String,
    user: String,
}

impl KeyringCredentialStorage {
    /// Uses the default GradeFlow entry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, KEYRING_USER)
    }

    /// Uses a custom service/user pair.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    async fn with_entry<T, F>(&self, op: F) -> Result<keyring::Result<T>, CredentialError>
    where
        T: Send + 'static,
        F: FnOnce(&Entry) -> keyring::Result<T> + Send + 'static,
    {
        let service = self.service.clone();
        let user = self.user.clone();
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &user)
                .map_err(|e| CredentialError::AccessFailed(e.to_string()))?;
            Ok(op(&entry))
        })
        .await
        .map_err(|e| CredentialError::AccessFailed(format!("keyring task failed: {e}")))?
    }
}

impl Default for KeyringCredentialStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStoragePort for KeyringCredentialStorage {
    async fn get_token(&self) -> Result<Option<BearerToken>, CredentialError> {
        debug!(service = %self.service, "Reading token from keyring");

        match self.with_entry(|entry| entry.get_password().map(Zeroizing::new)).await? {
            Ok(secret) => Ok(BearerToken::parse(secret.as_str())
                .inspect_err(|e| warn!(error = %e, "Ignoring unusable keyring entry"))
                .ok()),
            Err(keyring::Error::NoEntry) => {
                debug!("No token stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to read token from keyring");
                Err(CredentialError::RetrievalFailed(e.to_string()))
            }
        }
    }

    async fn store_token(&self, token: &BearerToken) -> Result<(), CredentialError> {
        debug!(service = %self.service, token = %token.fingerprint(), "Saving token to keyring");

        let secret = Zeroizing::new(token.as_str().to_string());
        self.with_entry(move |entry| entry.set_password(&secret))
            .await?
            .map_err(|e| {
                warn!(error = %e, "Failed to save token to keyring");
                CredentialError::StorageFailed(e.to_string())
            })
    }

    async fn delete_token(&self) -> Result<(), CredentialError> {
        debug!(service = %self.service, "Removing token from keyring");

        match self.with_entry(Entry::delete_credential).await? {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Failed to remove token from keyring");
                Err(CredentialError::DeletionFailed(e.to_string()))
            }
        }
    }
}
