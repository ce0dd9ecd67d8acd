//! Domain error types.

mod api_error;
mod credential_error;
mod editor_error;
mod load_error;
mod login_error;
mod token_error;

pub use api_error::ApiError;
pub use credential_error::CredentialError;
pub use editor_error::EditorError;
pub use load_error::{LoadError, TransportError};
pub use login_error::LoginError;
pub use token_error::TokenFormatError;
