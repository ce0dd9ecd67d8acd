//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{AppConfig, EditorConfig, LogLevel, MAX_OUTPUT_SIZE, NotificationsConfig};
pub use args::{CliArgs, Command, CropArgs};
pub use storage::{ConfigError, StorageManager};
