//! GradeFlow API HTTP client for profile and avatar endpoints.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::{debug, warn};

use super::dto::{ErrorResponse, ProfileResponse};
use super::{USER_AGENT, normalize_base_url};
use crate::domain::entities::{AvatarFile, BearerToken, UpdatedProfile};
use crate::domain::errors::ApiError;
use crate::domain::ports::{AvatarApi, CredentialStoragePort};

const PROFILE_PATH: &str = "users/me";
const AVATAR_PATH: &str = "users/me/avatar";

/// Authenticated client for the avatar endpoints.
pub struct GradeFlowApiClient {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStoragePort>,
}

impl GradeFlowApiClient {
    /// Creates client for `base_url`.
    ///
    /// A trailing slash is added so relative endpoints join under the base path.
    ///
    /// # Errors
    /// Returns error if the URL is invalid or HTTP client creation fails.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        credentials: Arc<dyn CredentialStoragePort>,
    ) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)
            .ok_or_else(|| ApiError::unexpected(format!("invalid API base URL: {base_url}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Base URL all endpoints are joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::unexpected(format!("invalid endpoint {path}: {e}")))
    }

    async fn bearer(&self) -> Result<BearerToken, ApiError> {
        match self.credentials.get_token().await {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(ApiError::NoCredential),
            Err(e) => {
                warn!(error = %e, "Failed to read credential");
                Err(ApiError::NoCredential)
            }
        }
    }

    async fn send_for_profile(&self, request: RequestBuilder) -> Result<UpdatedProfile, ApiError> {
        let token = self.bearer().await?;

        let response = request
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach GradeFlow API");
                if e.is_timeout() {
                    ApiError::network("request timed out")
                } else if e.is_connect() {
                    ApiError::network("failed to connect to GradeFlow")
                } else {
                    ApiError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, response).await);
        }

        let profile: ProfileResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse profile response");
            ApiError::invalid_response(e.to_string())
        })?;

        Ok(profile.into())
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> ApiError {
        let error_message = match response.json::<ErrorResponse>().await {
            Ok(error) => error.message,
            Err(_) => format!("HTTP {status}"),
        };

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::BAD_REQUEST
            | StatusCode::FORBIDDEN
            | StatusCode::NOT_FOUND
            | StatusCode::PAYLOAD_TOO_LARGE
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
            | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::rejected(status.as_u16(), error_message)
            }
            StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::BAD_GATEWAY
            | StatusCode::GATEWAY_TIMEOUT => {
                ApiError::network("GradeFlow API is temporarily unavailable")
            }
            _ => ApiError::unexpected(format!("unexpected response: {status} - {error_message}")),
        }
    }
}

#[async_trait]
impl AvatarApi for GradeFlowApiClient {
    async fn current_profile(&self) -> Result<UpdatedProfile, ApiError> {
        let url = self.endpoint(PROFILE_PATH)?;
        debug!(url = %url, "Fetching current profile");
        self.send_for_profile(self.client.get(url)).await
    }

    async fn upload_avatar(&self, file: AvatarFile) -> Result<UpdatedProfile, ApiError> {
        let url = self.endpoint(AVATAR_PATH)?;
        debug!(url = %url, len = file.bytes.len(), "Uploading avatar");

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name)
            .mime_str(&file.media_type)
            .map_err(|e| ApiError::unexpected(format!("invalid media type: {e}")))?;
        let form = Form::new().part("file", part);

        self.send_for_profile(self.client.post(url).multipart(form))
            .await
    }

    async fn remove_avatar(&self) -> Result<UpdatedProfile, ApiError> {
        let url = self.endpoint(AVATAR_PATH)?;
        debug!(url = %url, "Removing avatar");
        self.send_for_profile(self.client.delete(url)).await
    }
}
