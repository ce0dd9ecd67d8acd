//! Infrastructure layer with external service adapters.

/// GradeFlow API client, image transport and path resolution.
pub mod api;
/// Application configuration.
pub mod config;
/// Object URLs, rasterization, and color memoization.
pub mod image;
/// Desktop notifications.
pub mod notifications;
/// Credential storage adapters.
pub mod storage;

pub use api::{ApiPathResolver, GradeFlowApiClient, ReqwestImageTransport};
pub use config::{AppConfig, CliArgs, Command, LogLevel, StorageManager};
pub use image::{InMemoryObjectUrlRegistry, LruColorStore, PngRasterizer};
pub use notifications::DesktopNotificationService;
pub use storage::{KeyringCredentialStorage, MemoryCredentialStorage};
