use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::modpack::ModpackLayout;

/// How the modpack landed in the target game directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The game directory did not exist; the whole tree was copied.
    Fresh,
    /// The game directory existed; only `mods/` was replaced.
    MergedMods,
}

/// Places the extracted modpack at `game_dir`.
///
/// An existing game directory keeps everything except `mods/`, which is
/// replaced by the modpack's. Otherwise the whole extracted tree is copied.
/// Like extraction, the copy only stops through `cancel`, checked per entry.
pub async fn place_modpack(
    layout: &ModpackLayout,
    game_dir: &Path,
    cancel: &CancellationToken,
) -> InstallerResult<Placement> {
    let layout = layout.clone();
    let game_dir = game_dir.to_path_buf();
    let cancel = cancel.clone();
    tokio::task::spawn_blocking(move || place_modpack_blocking(&layout, &game_dir, &cancel))
        .await
        .map_err(|e| InstallerError::Other(format!("Task join error: {e}")))?
}

fn place_modpack_blocking(
    layout: &ModpackLayout,
    game_dir: &Path,
    cancel: &CancellationToken,
) -> InstallerResult<Placement> {
    if cancel.is_cancelled() {
        return Err(InstallerError::Cancelled);
    }
    if game_dir.exists() {
        let target_mods = game_dir.join("mods");
        remove_entry(&target_mods)?;
        let source_mods = layout.mods_dir();
        if source_mods.is_dir() {
            copy_dir_recursive(&source_mods, &target_mods, cancel)?;
        }
        info!("Refreshed mods in existing game directory {:?}", game_dir);
        Ok(Placement::MergedMods)
    } else {
        copy_dir_recursive(layout.root(), game_dir, cancel)?;
        info!("Copied modpack to new game directory {:?}", game_dir);
        Ok(Placement::Fresh)
    }
}

/// Removes a file, symlink/junction or directory tree at `path` if present.
fn remove_entry(path: &Path) -> InstallerResult<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(source) => return Err(InstallerError::io(path, source)),
    };

    let result = if metadata.file_type().is_symlink() {
        // Directory links on Windows need remove_dir.
        std::fs::remove_file(path).or_else(|_| std::fs::remove_dir(path))
    } else if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|source| InstallerError::io(path, source))
}

fn copy_dir_recursive(
    source: &Path,
    destination: &Path,
    cancel: &CancellationToken,
) -> InstallerResult<()> {
    std::fs::create_dir_all(destination)
        .map_err(|source_err| InstallerError::io(destination, source_err))?;

    let entries =
        std::fs::read_dir(source).map_err(|source_err| InstallerError::io(source, source_err))?;
    for entry in entries {
        if cancel.is_cancelled() {
            return Err(InstallerError::Cancelled);
        }
        let entry = entry.map_err(|source_err| InstallerError::io(source, source_err))?;
        let src_path = entry.path();
        let dst_path: PathBuf = destination.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|source_err| InstallerError::io(&src_path, source_err))?;

        if file_type.is_dir() {
            copy_dir_recursive(&src_path, &dst_path, cancel)?;
        } else if file_type.is_file() {
            std::fs::copy(&src_path, &dst_path)
                .map_err(|source_err| InstallerError::io(&dst_path, source_err))?;
        }
    }

    Ok(())
}
