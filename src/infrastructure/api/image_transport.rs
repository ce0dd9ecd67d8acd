//! `reqwest` implementation of the image transport port.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::trace;

use super::USER_AGENT;
use crate::domain::entities::BearerToken;
use crate::domain::errors::TransportError;
use crate::domain::ports::{HttpImageResponse, ImageTransport};

/// Bearer-authenticated image downloads over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestImageTransport {
    client: Client,
}

impl ReqwestImageTransport {
    /// Creates a transport with the given request timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageTransport for ReqwestImageTransport {
    async fn get(
        &self,
        url: &str,
        token: &BearerToken,
    ) -> Result<HttpImageResponse, TransportError> {
        trace!(url, "Fetching image");

        let response = self
            .client
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::new("request timed out")
                } else if e.is_connect() {
                    TransportError::new(format!("failed to connect: {e}"))
                } else {
                    TransportError::new(format!("request failed: {e}"))
                }
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::new(format!("failed to read body: {e}")))?;

        Ok(HttpImageResponse {
            status,
            content_type,
            body,
        })
    }
}
