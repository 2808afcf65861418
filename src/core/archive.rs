use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::error::{InstallerError, InstallerResult};

/// Unpacks `zip_path` into `destination` off the async runtime.
///
/// The returned future must be awaited to completion: dropping it does not
/// stop the blocking task. Cancel through `cancel` instead.
pub async fn extract_zip(
    zip_path: &Path,
    destination: &Path,
    cancel: &CancellationToken,
) -> InstallerResult<()> {
    let zip_path = zip_path.to_path_buf();
    let destination = destination.to_path_buf();
    let cancel = cancel.clone();
    tokio::task::spawn_blocking(move || extract_zip_blocking(&zip_path, &destination, &cancel))
        .await
        .map_err(|e| InstallerError::Extraction(format!("Task join error: {e}")))?
}

/// Unpacks every entry of the archive under `destination`, keeping the
/// archive's own directory structure. Entries whose names would escape the
/// destination are skipped. Stops before the next entry once `cancel` fires.
pub fn extract_zip_blocking(
    zip_path: &Path,
    destination: &Path,
    cancel: &CancellationToken,
) -> InstallerResult<()> {
    let zip_file = std::fs::File::open(zip_path)
        .map_err(|e| InstallerError::Extraction(format!("cannot open {:?}: {}", zip_path, e)))?;
    let mut archive = zip::ZipArchive::new(zip_file)?;

    std::fs::create_dir_all(destination)
        .map_err(|source| InstallerError::io(destination, source))?;

    for index in 0..archive.len() {
        if cancel.is_cancelled() {
            return Err(InstallerError::Cancelled);
        }
        let mut zipped = archive.by_index(index)?;

        let Some(enclosed_name) = zipped.enclosed_name() else {
            warn!("Skipping unsafe zip entry {:?}", zipped.name());
            continue;
        };
        let out_path: PathBuf = destination.join(enclosed_name);

        if zipped.is_dir() {
            std::fs::create_dir_all(&out_path)
                .map_err(|source| InstallerError::io(&out_path, source))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| InstallerError::io(parent, source))?;
        }

        let mut out = std::fs::File::create(&out_path)
            .map_err(|source| InstallerError::io(&out_path, source))?;
        std::io::copy(&mut zipped, &mut out)
            .map_err(|e| InstallerError::Extraction(format!("{:?}: {}", out_path, e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = zipped.unix_mode() {
                let _ = std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode));
            }
        }
    }

    debug!("Extracted {} entries from {:?}", archive.len(), zip_path);
    Ok(())
}
