//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::entities::AVATAR_OUTPUT_SIZE;

const APP_NAME: &str = "gradeflow-avatar";
const APP_QUALIFIER: &str = "app";
const APP_ORGANIZATION: &str = "gradeflow";

/// Largest accepted `editor.output_size`, in pixels per side.
pub const MAX_OUTPUT_SIZE: u32 = 2048;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application configuration from file and CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Base URL of the GradeFlow REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Avatar editor configuration.
    #[serde(default)]
    pub editor: EditorConfig,

    /// Notification configuration.
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

/// Avatar editor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Side length of the uploaded avatar in pixels.
    #[serde(default = "default_output_size")]
    pub output_size: u32,

    /// Side length of the on-screen editing viewport in pixels.
    #[serde(default = "default_viewport_size")]
    pub viewport_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            output_size: default_output_size(),
            viewport_size: default_viewport_size(),
        }
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Mirror notifications to the desktop.
    #[serde(default)]
    pub desktop: bool,

    /// How long a toast stays visible, in seconds.
    #[serde(default = "default_notification_duration")]
    pub duration_secs: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            desktop: false,
            duration_secs: default_notification_duration(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api/".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_output_size() -> u32 {
    AVATAR_OUTPUT_SIZE
}

const fn default_viewport_size() -> f64 {
    320.0
}

const fn default_notification_duration() -> u64 {
    5
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_base_url) = &args.api_base_url {
            self.api_base_url.clone_from(api_base_url);
        }
        if let Some(timeout) = args.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(desktop) = args.desktop_notifications {
            self.notifications.desktop = desktop;
        }
    }

    /// Replaces values the editor or HTTP client cannot work with by their
    /// defaults.
    pub fn sanitize(&mut self) {
        if self.editor.output_size == 0 {
            tracing::warn!("editor.output_size must be positive, using default");
            self.editor.output_size = default_output_size();
        } else if self.editor.output_size > MAX_OUTPUT_SIZE {
            tracing::warn!(
                requested = self.editor.output_size,
                max = MAX_OUTPUT_SIZE,
                "editor.output_size too large, clamping"
            );
            self.editor.output_size = MAX_OUTPUT_SIZE;
        }
        if !(self.editor.viewport_size.is_finite() && self.editor.viewport_size > 0.0) {
            tracing::warn!("editor.viewport_size must be positive, using default");
            self.editor.viewport_size = default_viewport_size();
        }
        if self.request_timeout_secs == 0 {
            tracing::warn!("request_timeout_secs must be positive, using default");
            self.request_timeout_secs = default_request_timeout();
        }
    }

    /// Request timeout as a duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Toast duration as a duration.
    #[must_use]
    pub const fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notifications.duration_secs)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("gradeflow-avatar.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
            editor: EditorConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_with_sections() {
        let toml_content = r#"
            api_base_url = "https://grades.school.example/api/"
            log_level = "debug"

            [editor]
            viewport_size = 400.0

            [notifications]
            desktop = true
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.api_base_url, "https://grades.school.example/api/");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!((config.editor.viewport_size - 400.0).abs() < f64::EPSILON);
        assert_eq!(config.editor.output_size, 512);
        assert!(config.notifications.desktop);
        assert_eq!(config.notifications.duration_secs, 5);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.editor.output_size, AVATAR_OUTPUT_SIZE);
        assert!(!config.notifications.desktop);
    }

    #[test]
    fn test_cli_args_override_file_values() {
        use clap::Parser;

        let mut config = AppConfig::default();
        let args = CliArgs::try_parse_from([
            "gradeflow-avatar",
            "--api-base-url",
            "https://other.example/api/",
            "--desktop-notifications",
            "true",
            "logout",
        ])
        .unwrap();

        config.merge_with_args(&args);

        assert_eq!(config.api_base_url, "https://other.example/api/");
        assert!(config.notifications.desktop);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_sanitize_restores_unusable_values() {
        let mut config = AppConfig::default();
        config.editor.output_size = 0;
        config.editor.viewport_size = f64::NAN;
        config.request_timeout_secs = 0;

        config.sanitize();

        assert_eq!(config.editor.output_size, AVATAR_OUTPUT_SIZE);
        assert!((config.editor.viewport_size - 320.0).abs() < f64::EPSILON);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_sanitize_clamps_oversized_output() {
        let mut config = AppConfig::default();
        config.editor.output_size = 100_000;
        config.sanitize();
        assert_eq!(config.editor.output_size, MAX_OUTPUT_SIZE);

        config.editor.output_size = 1024;
        config.sanitize();
        assert_eq!(config.editor.output_size, 1024);
    }
}
