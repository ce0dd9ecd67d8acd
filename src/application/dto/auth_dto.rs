//! Sign-in DTOs.

use crate::domain::entities::UpdatedProfile;

/// Source of the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Token from the system keyring.
    Keyring,
    /// Token from `--token` or `GRADEFLOW_TOKEN`.
    CommandLine,
}

impl TokenSource {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Keyring => "system keyring",
            Self::CommandLine => "command line / environment",
        }
    }
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Login request data.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Bearer token to verify.
    pub token: String,
    /// Whether to persist the token in the keyring.
    pub persist_token: bool,
}

impl LoginRequest {
    /// Creates new login request.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self {
            token,
            persist_token: true,
        }
    }

    /// Disables token persistence.
    #[must_use]
    pub const fn without_persistence(mut self) -> Self {
        self.persist_token = false;
        self
    }
}

/// Login response data.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Profile of the signed-in user.
    pub profile: UpdatedProfile,
    /// Whether the token was persisted.
    pub token_persisted: bool,
}
