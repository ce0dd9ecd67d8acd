//! Bearer credential value object.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::errors::TokenFormatError;

/// Short-lived API bearer token with validation and masking.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct BearerToken {
    value: String,
}

impl BearerToken {
    const MIN_TOKEN_LENGTH: usize = 16;

    /// Parses a token, trimming surrounding whitespace.
    ///
    /// Only RFC 6750 `b64token` characters are accepted.
    ///
    /// # Errors
    /// Returns the first rule the input breaks.
    pub fn parse(value: impl Into<String>) -> Result<Self, TokenFormatError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(TokenFormatError::Empty);
        }
        if !value.bytes().all(Self::is_token_byte) || value.starts_with('=') {
            return Err(TokenFormatError::InvalidCharacter);
        }
        if value.len() < Self::MIN_TOKEN_LENGTH {
            return Err(TokenFormatError::TooShort {
                len: value.len(),
                min: Self::MIN_TOKEN_LENGTH,
            });
        }
        Ok(Self { value })
    }

    /// Like [`BearerToken::parse`], discarding the reason.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        Self::parse(value).ok()
    }

    const fn is_token_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b'+' | b'/' | b'=')
    }

    /// Creates token without validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// First and last four characters, e.g. `eyJh...dXJl`. Short tokens are
    /// fully starred.
    #[must_use]
    pub fn masked(&self) -> String {
        let len = self.value.len();
        match self.value.get(..4).zip(self.value.get(len.saturating_sub(4)..)) {
            Some((head, tail)) if len > 10 => format!("{head}...{tail}"),
            _ => "*".repeat(len),
        }
    }

    /// Hex fingerprint identifying the token in logs without revealing it.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.value.as_bytes());
        hex::encode(&hasher.finalize()[..4])
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}
