//! Bearer token format errors.

use thiserror::Error;

/// Why a string was not accepted as a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum TokenFormatError {
    #[error("token is empty")]
    Empty,

    #[error("token is {len} characters long, at least {min} expected")]
    TooShort { len: usize, min: usize },

    #[error("token contains characters not allowed in a bearer token")]
    InvalidCharacter,
}
