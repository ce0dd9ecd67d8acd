//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{LoginRequest, LoginResponse};
use crate::domain::entities::BearerToken;
use crate::domain::errors::LoginError;
use crate::domain::ports::{AvatarApi, CredentialStoragePort};

/// Verifies a bearer token against the API and stores it.
#[derive(Clone)]
pub struct LoginUseCase {
    api: Arc<dyn AvatarApi>,
    session: Arc<dyn CredentialStoragePort>,
    storage: Arc<dyn CredentialStoragePort>,
}

impl LoginUseCase {
    /// Creates new login use case.
    ///
    /// `session` is the credential cache `api` reads from; `storage` is the
    /// persistent store.
    #[must_use]
    pub const fn new(
        api: Arc<dyn AvatarApi>,
        session: Arc<dyn CredentialStoragePort>,
        storage: Arc<dyn CredentialStoragePort>,
    ) -> Self {
        Self {
            api,
            session,
            storage,
        }
    }

    /// Executes login with provided request.
    ///
    /// # Errors
    /// Returns error if the token is malformed or rejected.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginResponse, LoginError> {
        let token = BearerToken::parse(request.token.as_str()).map_err(|e| {
            warn!(error = %e, "Invalid token format provided");
            LoginError::invalid_format(e.to_string())
        })?;

        debug!(token = %token.fingerprint(), "Token format validated, checking with API");
        self.session.store_token(&token).await?;

        let profile = match self.api.current_profile().await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Token verification failed");
                if let Err(clear) = self.session.delete_token().await {
                    debug!(error = %clear, "Failed to clear session token");
                }
                return Err(LoginError::Rejected(e));
            }
        };

        info!(user_id = %profile.id, username = %profile.username, "Successfully authenticated");

        let token_persisted = if request.persist_token {
            match self.storage.store_token(&token).await {
                Ok(()) => {
                    info!("Token persisted to secure storage");
                    true
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to persist token to secure storage");
                    false
                }
            }
        } else {
            debug!("Token persistence disabled, skipping storage");
            false
        };

        Ok(LoginResponse {
            profile,
            token_persisted,
        })
    }

    /// Deletes the stored token.
    ///
    /// # Errors
    /// Returns error if deletion fails.
    pub async fn logout(&self) -> Result<(), LoginError> {
        debug!("Deleting token from secure storage");
        self.session.delete_token().await?;
        match self.storage.delete_token().await {
            Ok(()) => {
                info!("Token deleted from secure storage");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to delete token from secure storage");
                Err(e.into())
            }
        }
    }
}
