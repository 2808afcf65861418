use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

const SETTINGS_FILE: &str = "modpackInstaller.json";

/// User overrides for the resolved platform layout.
///
/// Stored outside the staging root, which is deleted after every attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerSettings {
    pub staging_dir: Option<PathBuf>,
    pub launcher_dir: Option<PathBuf>,
    pub game_root: Option<PathBuf>,
    pub java_path: Option<PathBuf>,
}

impl InstallerSettings {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SETTINGS_FILE)
    }

    /// Loads settings from `path`, falling back to defaults if the file is
    /// missing or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring corrupt settings file {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
