use std::path::{Path, PathBuf};

use crate::core::settings::InstallerSettings;

const STAGING_DIR_NAME: &str = "modpackInstaller";
const REGISTRY_FILE_NAME: &str = "launcher_profiles.json";

/// Operating system family the paths are resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    /// Linux and anything else without a dedicated layout.
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Directory name of the launcher under its parent directory.
    pub fn launcher_dir_name(&self) -> &'static str {
        match self {
            Platform::MacOs => "minecraft",
            Platform::Windows | Platform::Unix => ".minecraft",
        }
    }
}

/// Platform-neutral locations the rest of the crate asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalPath {
    StagingRoot,
    /// A path relative to the staging root.
    Staging(PathBuf),
    LauncherRoot,
    GameRoot,
    ProfileRegistry,
}

/// Maps [`LogicalPath`]s to absolute paths for one platform.
///
/// Built once per process; resolution itself is pure and never fails.
#[derive(Debug, Clone)]
pub struct PathResolver {
    platform: Platform,
    staging_root: PathBuf,
    launcher_root: PathBuf,
    game_root: PathBuf,
}

impl PathResolver {
    /// Layout for `platform` given the OS user-support (app data) dir and the home dir.
    ///
    /// - macOS: launcher in `<support>/minecraft`, game dirs under the launcher root.
    /// - Windows: launcher in `<support>/.minecraft`, game dirs directly under `<support>`.
    /// - Unix: launcher in `~/.minecraft`, game dirs under the launcher root.
    pub fn for_platform(platform: Platform, support_dir: &Path, home_dir: &Path) -> Self {
        let staging_root = support_dir.join(STAGING_DIR_NAME);
        let (launcher_root, game_root) = match platform {
            Platform::MacOs => {
                let root = support_dir.join(platform.launcher_dir_name());
                (root.clone(), root)
            }
            Platform::Windows => (
                support_dir.join(platform.launcher_dir_name()),
                support_dir.to_path_buf(),
            ),
            Platform::Unix => {
                let root = home_dir.join(platform.launcher_dir_name());
                (root.clone(), root)
            }
        };

        Self {
            platform,
            staging_root,
            launcher_root,
            game_root,
        }
    }

    /// Layout for the running OS, with any overrides from `settings` applied.
    pub fn detect(settings: &InstallerSettings) -> Self {
        let support_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::for_platform(Platform::current(), &support_dir, &home_dir).with_overrides(settings)
    }

    pub fn with_overrides(mut self, settings: &InstallerSettings) -> Self {
        if let Some(dir) = &settings.launcher_dir {
            // The game root follows the launcher unless it was split off by the platform.
            if self.game_root == self.launcher_root {
                self.game_root = dir.clone();
            }
            self.launcher_root = dir.clone();
        }
        if let Some(dir) = &settings.game_root {
            self.game_root = dir.clone();
        }
        // Cleanup deletes the staging root, so an override only names its parent.
        if let Some(dir) = &settings.staging_dir {
            self.staging_root = dir.join(STAGING_DIR_NAME);
        }
        self
    }

    pub fn resolve(&self, logical: &LogicalPath) -> PathBuf {
        match logical {
            LogicalPath::StagingRoot => self.staging_root.clone(),
            LogicalPath::Staging(relative) => self.staging_root.join(relative),
            LogicalPath::LauncherRoot => self.launcher_root.clone(),
            LogicalPath::GameRoot => self.game_root.clone(),
            LogicalPath::ProfileRegistry => self.launcher_root.join(REGISTRY_FILE_NAME),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    pub fn launcher_root(&self) -> &Path {
        &self.launcher_root
    }

    pub fn game_root(&self) -> &Path {
        &self.game_root
    }

    pub fn profile_registry(&self) -> PathBuf {
        self.resolve(&LogicalPath::ProfileRegistry)
    }
}
