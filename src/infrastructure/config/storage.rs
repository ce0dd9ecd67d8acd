//! On-disk settings and the remembered placeholder colors.
//!
//! Both files live in the project config directory. Writes go through a
//! temporary file in the same directory and are renamed into place.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::AppConfig;
use crate::domain::entities::AvatarColor;
use crate::infrastructure::image::LruColorStore;

const CONFIG_FILE_NAME: &str = "config.toml";
const COLORS_FILE_NAME: &str = "colors.toml";

#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("no config directory available for this platform")]
    ConfigDirNotFound,
    #[error("config file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode config: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// `colors.toml` layout: display name to `#rrggbb`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ColorTable {
    /// Keys from most to least recently used.
    #[serde(default)]
    order: Vec<String>,
    #[serde(default)]
    colors: BTreeMap<String, String>,
}

/// Reads and writes the files under the config directory.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigDirNotFound` if there is none.
    pub fn new() -> Result<Self, ConfigError> {
        AppConfig::default_config_dir()
            .map(Self::with_dir)
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Uses `config_dir`; tests point this at a temp dir.
    #[must_use]
    pub const fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Directory holding every file this manager writes.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of `config.toml`.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Reads `config.toml`, or `path_override` when given.
    ///
    /// A missing file is created with defaults. A file that does not parse
    /// is left untouched and defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the default
    /// cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = path_override.map_or_else(|| self.config_path(), Path::to_path_buf);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No config file, writing defaults");
                let config = AppConfig::default();
                write_toml(&path, &config)?;
                return Ok(config);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Config file is invalid, using defaults");
            AppConfig::default()
        }))
    }

    /// Writes `config.toml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        write_toml(&self.config_path(), config)
    }

    /// Loads remembered placeholder colors into a store of `capacity`.
    ///
    /// Unreadable files and malformed entries are skipped.
    #[must_use]
    pub fn load_colors(&self, capacity: usize) -> LruColorStore {
        let path = self.config_dir.join(COLORS_FILE_NAME);
        let table = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<ColorTable>(&content).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring unreadable color table");
                ColorTable::default()
            }),
            Err(_) => ColorTable::default(),
        };

        let mut entries: Vec<(String, AvatarColor)> = Vec::with_capacity(table.colors.len());
        let ordered = table
            .order
            .iter()
            .chain(table.colors.keys().filter(|k| !table.order.contains(k)));
        for key in ordered {
            let Some(color) = table.colors.get(key).and_then(|v| AvatarColor::from_hex(v)) else {
                continue;
            };
            if !entries.iter().any(|(k, _)| k == key) {
                entries.push((key.clone(), color));
            }
        }

        debug!(count = entries.len(), "Loaded placeholder colors");
        LruColorStore::with_entries(capacity, entries)
    }

    /// Persists the colors held by `store`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save_colors(&self, store: &LruColorStore) -> Result<(), ConfigError> {
        let entries = store.entries();
        let table = ColorTable {
            order: entries.iter().map(|(k, _)| k.clone()).collect(),
            colors: entries.into_iter().map(|(k, c)| (k, c.to_hex())).collect(),
        };
        write_toml(&self.config_dir.join(COLORS_FILE_NAME), &table)
    }
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(value)?;
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::other("config path has no parent directory"))?;
    fs::create_dir_all(dir)?;

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(content.as_bytes())?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::AvatarColorStore;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("gradeflow-avatar"));

        let config = manager.load_config(None).unwrap();

        assert_eq!(config.request_timeout_secs, 30);
        assert!(manager.config_path().exists());
    }

    #[test]
    fn test_malformed_config_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        fs::write(manager.config_path(), "api_base_url = [").unwrap();

        let config = manager.load_config(None).unwrap();

        assert_eq!(config.api_base_url, AppConfig::default().api_base_url);
        let content = fs::read_to_string(manager.config_path()).unwrap();
        assert_eq!(content, "api_base_url = [");
    }

    #[test]
    fn test_saved_config_reloads() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());

        let mut config = AppConfig::default();
        config.api_base_url = "https://grades.example/api/".to_string();
        config.editor.viewport_size = 256.0;
        manager.save_config(&config).unwrap();

        let loaded = manager.load_config(None).unwrap();
        assert_eq!(loaded.api_base_url, "https://grades.example/api/");
        assert!((loaded.editor.viewport_size - 256.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_override_path_wins() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("unused"));
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "request_timeout_secs = 7\n").unwrap();

        let config = manager.load_config(Some(&custom)).unwrap();

        assert_eq!(config.request_timeout_secs, 7);
        assert!(!manager.config_path().exists());
    }

    #[test]
    fn test_colors_survive_restart() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());

        let store = manager.load_colors(8);
        assert!(store.is_empty());
        store.put("Jane Doe", AvatarColor::rgb(0x29, 0x80, 0xb9));
        store.put("Ada", AvatarColor::rgb(0xe6, 0x7e, 0x22));
        manager.save_colors(&store).unwrap();

        let restored = manager.load_colors(8);
        assert_eq!(restored.entries(), store.entries());
    }

    #[test]
    fn test_bad_color_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        fs::write(
            dir.path().join(COLORS_FILE_NAME),
            "[colors]\nJane = \"#123456\"\nBob = \"blue\"\n",
        )
        .unwrap();

        let store = manager.load_colors(8);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Jane"), Some(AvatarColor::rgb(0x12, 0x34, 0x56)));
    }
}
