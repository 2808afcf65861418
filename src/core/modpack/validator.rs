use std::path::{Path, PathBuf};

use tracing::debug;

/// Expected shape of an extracted modpack.
///
/// ```text
/// modpack/
///   installer/profile.json
///   installer/installer.jar
///   mods/            (optional)
/// ```
#[derive(Debug, Clone)]
pub struct ModpackLayout {
    root: PathBuf,
}

impl ModpackLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn installer_dir(&self) -> PathBuf {
        self.root.join("installer")
    }

    pub fn profile_path(&self) -> PathBuf {
        self.installer_dir().join("profile.json")
    }

    pub fn installer_jar(&self) -> PathBuf {
        self.installer_dir().join("installer.jar")
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.root.join("mods")
    }

    /// Paths that must all exist, checked in this order.
    pub fn required_paths(&self) -> [PathBuf; 4] {
        [
            self.root.clone(),
            self.installer_dir(),
            self.profile_path(),
            self.installer_jar(),
        ]
    }
}

pub struct ModpackValidator;

impl ModpackValidator {
    /// True only if every required path of the layout exists.
    /// Stops at the first missing one.
    pub fn validate(extracted_root: &Path) -> bool {
        let layout = ModpackLayout::new(extracted_root);
        for path in layout.required_paths() {
            if !path.exists() {
                debug!("Modpack check failed, missing {:?}", path);
                return false;
            }
        }
        true
    }
}
