//! Application layer with services, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Avatar loading, editing and notification services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{LoginRequest, LoginResponse, TokenSource};
pub use services::{AvatarEditor, AvatarImageLoader, ToastQueue};
pub use use_cases::{LoginUseCase, ResolveTokenUseCase, ResolvedToken};
