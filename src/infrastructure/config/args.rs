use super::app_config::LogLevel;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "gradeflow-avatar",
    version,
    about = "Fetch, crop and upload GradeFlow profile avatars",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Base URL of the GradeFlow API.
    #[arg(long, value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// HTTP request timeout in seconds.
    #[arg(long, global = true)]
    pub request_timeout_secs: Option<u64>,

    /// Mirror notifications to the desktop.
    #[arg(long, global = true)]
    pub desktop_notifications: Option<bool>,

    /// Bearer token; takes effect when none is stored in the keyring.
    #[arg(long, env = "GRADEFLOW_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download an avatar through the authenticated loader.
    Fetch {
        /// Avatar path as returned by the API; defaults to the signed-in user's.
        path: Option<String>,

        /// Write the image here instead of only reporting it.
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Crop a local image into a square PNG without uploading.
    Crop {
        /// Source image.
        input: PathBuf,

        #[command(flatten)]
        crop: CropArgs,

        /// Output PNG path.
        #[arg(short, long, value_name = "PATH")]
        out: PathBuf,
    },

    /// Crop a local image and upload it as the new avatar.
    Upload {
        /// Source image.
        input: PathBuf,

        #[command(flatten)]
        crop: CropArgs,
    },

    /// Remove the current avatar.
    Remove,

    /// Verify the `--token` value and store it in the system keyring.
    Login,

    /// Delete the stored bearer token.
    Logout,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct CropArgs {
    /// Zoom factor, 1.0 to 3.0.
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f64,

    /// Horizontal pan, -1.0 (left edge) to 1.0.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub offset_x: f64,

    /// Vertical pan, -1.0 to 1.0.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub offset_y: f64,
}
