//! Domain entity definitions.

mod avatar;
mod crop;
mod image_ref;
mod load_state;
mod token;

pub use avatar::{AVATAR_FILE_NAME, AVATAR_MEDIA_TYPE, AvatarColor, AvatarFile, UpdatedProfile};
pub use crop::{
    AVATAR_OUTPUT_SIZE, CropRect, CropTransform, DragGesture, MAX_ZOOM, MIN_ZOOM,
    ViewportTransform, WHEEL_ZOOM_DIVISOR,
};
pub use image_ref::{ImageReference, LOCAL_URL_SCHEME, LocalImageUrl};
pub use load_state::{AvatarImageState, LoadOutcome};
pub use token::BearerToken;
