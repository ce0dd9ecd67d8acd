//! Port for the avatar endpoints of the GradeFlow API.

use async_trait::async_trait;

use crate::domain::entities::{AvatarFile, UpdatedProfile};
use crate::domain::errors::ApiError;

/// Profile and avatar operations on the signed-in user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarApi: Send + Sync {
    /// Fetches the signed-in user's profile.
    async fn current_profile(&self) -> Result<UpdatedProfile, ApiError>;

    /// Replaces the avatar with `file`.
    async fn upload_avatar(&self, file: AvatarFile) -> Result<UpdatedProfile, ApiError>;

    /// Deletes the current avatar.
    async fn remove_avatar(&self) -> Result<UpdatedProfile, ApiError>;
}
