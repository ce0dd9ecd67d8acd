//! Domain layer with core avatar entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Transient user notifications.
#[allow(missing_docs)]
pub mod notification;
/// Port definitions.
pub mod ports;

pub use entities::{BearerToken, CropTransform, ImageReference, LocalImageUrl};
pub use errors::{ApiError, EditorError, LoadError};
pub use notification::{Notification, NotificationLevel};
pub use ports::{AvatarApi, CredentialStoragePort, ImageTransport, ObjectUrlRegistry};
