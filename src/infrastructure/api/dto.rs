//! GradeFlow API Data Transfer Objects.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::entities::UpdatedProfile;

/// Identifier that the API sends either as a number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    /// Numeric id.
    Number(u64),
    /// Textual id.
    Text(String),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Profile payload returned by `/users/me` and the avatar endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    /// User ID.
    pub id: IdValue,
    /// Login name.
    pub username: String,
    /// Display name.
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    /// Avatar path.
    #[serde(default, alias = "avatarUrl", alias = "avatar_url")]
    pub avatar: Option<String>,
    /// Last modification time.
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ProfileResponse> for UpdatedProfile {
    fn from(response: ProfileResponse) -> Self {
        Self {
            id: response.id.into_string(),
            username: response.username,
            full_name: response.full_name,
            avatar: response.avatar.filter(|a| !a.trim().is_empty()),
            updated_at: response.updated_at,
        }
    }
}

/// Error body returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    #[serde(alias = "detail", alias = "error")]
    pub message: String,
}
