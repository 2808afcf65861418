use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::paths::{LogicalPath, PathResolver};

pub const ARCHIVE_FILE: &str = "modpack.zip";
pub const EXTRACTED_DIR: &str = "modpack";
pub const INSTALLER_LOG: &str = "installer.jar.log";

/// Scratch directory owning every temporary artifact of one install attempt.
///
/// Layout:
/// - `<root>/modpack.zip`
/// - `<root>/modpack/`
/// - `<root>/installer.jar.log`
#[derive(Debug, Clone)]
pub struct StagingArea {
    paths: PathResolver,
}

impl StagingArea {
    pub fn new(paths: PathResolver) -> Self {
        Self { paths }
    }

    pub fn root(&self) -> PathBuf {
        self.paths.resolve(&LogicalPath::StagingRoot)
    }

    /// Scopes `relative` under the staging root.
    pub fn path(&self, relative: impl Into<PathBuf>) -> PathBuf {
        self.paths.resolve(&LogicalPath::Staging(relative.into()))
    }

    pub fn archive_path(&self) -> PathBuf {
        self.path(ARCHIVE_FILE)
    }

    pub fn extracted_root(&self) -> PathBuf {
        self.path(EXTRACTED_DIR)
    }

    pub fn installer_log(&self) -> PathBuf {
        self.path(INSTALLER_LOG)
    }

    /// Creates the staging root if it does not exist yet.
    pub async fn ensure(&self) -> InstallerResult<()> {
        let root = self.root();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| InstallerError::io(&root, source))?;
        debug!("Staging area ready at {:?}", root);
        Ok(())
    }

    /// Removes every staging artifact that exists, then the root itself.
    ///
    /// Safe to call repeatedly and on partially populated staging areas.
    pub async fn clean(&self) -> InstallerResult<()> {
        remove_file_if_exists(&self.archive_path()).await?;
        remove_file_if_exists(&self.installer_log()).await?;
        remove_dir_if_exists(&self.extracted_root()).await?;
        remove_dir_if_exists(&self.root()).await?;
        debug!("Staging area cleaned");
        Ok(())
    }
}

async fn remove_file_if_exists(path: &Path) -> InstallerResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(InstallerError::io(path, source)),
    }
}

async fn remove_dir_if_exists(path: &Path) -> InstallerResult<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(InstallerError::io(path, source)),
    }
}
