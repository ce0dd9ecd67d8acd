//! Application services.

pub mod avatar_editor;
pub mod avatar_image_loader;
pub mod notification_manager;
pub mod placeholder;

pub use avatar_editor::{AvatarEditor, CropDraft, EditorPhase};
pub use avatar_image_loader::AvatarImageLoader;
pub use notification_manager::{MAX_QUEUED_TOASTS, ToastQueue};
pub use placeholder::{Placeholder, initials, placeholder_for};
