use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::paths::{LogicalPath, PathResolver, Platform};

/// Java executable the mod-loader installer is launched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavaRuntime {
    /// An absolute path to a `java` binary.
    Bundled(PathBuf),
    /// Configured explicitly by the user.
    Configured(PathBuf),
    /// Bare `java`, resolved through `PATH` by the OS.
    SystemPath,
}

impl JavaRuntime {
    pub fn program(&self) -> &Path {
        match self {
            JavaRuntime::Bundled(path) | JavaRuntime::Configured(path) => path,
            JavaRuntime::SystemPath => Path::new(java_exe()),
        }
    }
}

/// Picks the Java runtime for the current platform.
///
/// Only macOS resolves the launcher's own bundled runtime. Windows and other
/// platforms use whatever `java` is on `PATH`; there is no auto-detection.
#[derive(Debug, Clone)]
pub struct RuntimeLocator {
    platform: Platform,
    launcher_root: PathBuf,
    configured: Option<PathBuf>,
}

impl RuntimeLocator {
    pub fn new(paths: &PathResolver, configured: Option<PathBuf>) -> Self {
        Self {
            platform: paths.platform(),
            launcher_root: paths.resolve(&LogicalPath::LauncherRoot),
            configured,
        }
    }

    /// Location of the runtime the macOS launcher ships with.
    pub fn bundled_path(&self) -> Option<PathBuf> {
        match self.platform {
            Platform::MacOs => Some(
                self.launcher_root
                    .join("runtime")
                    .join("jre-x64")
                    .join("jre.bundle")
                    .join("Contents")
                    .join("Home")
                    .join("bin")
                    .join(java_exe()),
            ),
            // TODO: locate the launcher's bundled runtime under `runtime/` on Windows.
            Platform::Windows | Platform::Unix => None,
        }
    }

    pub fn resolve(&self) -> JavaRuntime {
        if let Some(path) = &self.configured {
            debug!("Using configured Java at {:?}", path);
            return JavaRuntime::Configured(path.clone());
        }

        match self.bundled_path() {
            Some(path) if path.exists() => JavaRuntime::Bundled(path),
            Some(path) => {
                warn!("Bundled Java not found at {:?}, falling back to PATH", path);
                JavaRuntime::SystemPath
            }
            None => JavaRuntime::SystemPath,
        }
    }
}

pub fn java_exe() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}
