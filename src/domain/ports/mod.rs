mod avatar_api_port;
mod color_store_port;
mod credential_port;
mod image_transport_port;
mod notification_port;
mod object_url_port;
mod path_resolver_port;
mod rasterizer_port;

pub use avatar_api_port::AvatarApi;
#[cfg(test)]
pub use avatar_api_port::MockAvatarApi;
pub use color_store_port::AvatarColorStore;
pub use credential_port::CredentialStoragePort;
pub use image_transport_port::{HttpImageResponse, ImageTransport};
pub use notification_port::NotificationPort;
pub use object_url_port::{ObjectUrlRegistry, OwnedObjectUrl};
pub use path_resolver_port::PathResolver;
pub use rasterizer_port::{RasterError, Rasterizer};

#[cfg(test)]
pub mod mocks {
    pub use super::credential_port::mock::MockCredentialStorage;
    pub use super::image_transport_port::mock::{MockImageTransport, ScriptedReply};
    pub use super::notification_port::mock::MockNotificationPort;
}
