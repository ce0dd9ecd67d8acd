//! Port for authenticated image downloads.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::entities::BearerToken;
use crate::domain::errors::TransportError;

/// Raw answer to an image GET.
#[derive(Debug, Clone)]
pub struct HttpImageResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpImageResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// HTTP GET with bearer authentication.
///
/// Cancellation happens by dropping the returned future.
#[async_trait]
pub trait ImageTransport: Send + Sync {
    /// Fetches `url` with `token` attached as a bearer credential.
    async fn get(&self, url: &str, token: &BearerToken)
    -> Result<HttpImageResponse, TransportError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Scripted reply for one URL.
    #[derive(Debug, Clone)]
    pub enum ScriptedReply {
        /// Answer `status` with `body`.
        Respond { status: u16, body: Bytes },
        /// Fail at the transport level.
        Fail(String),
        /// Never answer.
        Hang,
    }

    /// Transport that replays scripted replies and records requests.
    #[derive(Default)]
    pub struct MockImageTransport {
        replies: Mutex<HashMap<String, ScriptedReply>>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl MockImageTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Scripts a 200 answer.
        pub fn ok(self, url: &str, body: &[u8]) -> Self {
            self.reply(
                url,
                ScriptedReply::Respond {
                    status: 200,
                    body: Bytes::copy_from_slice(body),
                },
            )
        }

        pub fn reply(self, url: &str, reply: ScriptedReply) -> Self {
            self.replies.lock().insert(url.to_string(), reply);
            self
        }

        /// Requests seen so far as `(url, token)` pairs.
        pub fn requests(&self) -> Vec<(String, String)> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl ImageTransport for MockImageTransport {
        async fn get(
            &self,
            url: &str,
            token: &BearerToken,
        ) -> Result<HttpImageResponse, TransportError> {
            self.requests
                .lock()
                .push((url.to_string(), token.as_str().to_string()));
            let reply = self.replies.lock().get(url).cloned();
            match reply {
                Some(ScriptedReply::Respond { status, body }) => Ok(HttpImageResponse {
                    status,
                    content_type: Some("image/png".to_string()),
                    body,
                }),
                Some(ScriptedReply::Fail(message)) => Err(TransportError::new(message)),
                Some(ScriptedReply::Hang) => std::future::pending().await,
                None => Ok(HttpImageResponse {
                    status: 404,
                    content_type: None,
                    body: Bytes::new(),
                }),
            }
        }
    }
}
