use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::java::JavaRuntime;

/// Longest chunk of installer output kept in an error.
const OUTPUT_TAIL_CHARS: usize = 2000;

/// Runs the modpack's bundled mod-loader installer.
#[async_trait]
pub trait ModloaderRunner: Send + Sync {
    async fn run(
        &self,
        java: &JavaRuntime,
        installer_jar: &Path,
        working_dir: &Path,
    ) -> InstallerResult<()>;
}

/// Executes `<java> -jar <installer.jar>` as a child process.
pub struct JavaInstallerRunner;

#[async_trait]
impl ModloaderRunner for JavaInstallerRunner {
    #[instrument(skip(self, java), fields(java = ?java.program()))]
    async fn run(
        &self,
        java: &JavaRuntime,
        installer_jar: &Path,
        working_dir: &Path,
    ) -> InstallerResult<()> {
        info!("Running mod-loader installer {:?}", installer_jar);

        let output = tokio::process::Command::new(java.program())
            .arg("-jar")
            .arg(installer_jar)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| InstallerError::SubprocessFailure {
                code: None,
                detail: format!("cannot start {:?}: {}", java.program(), e),
            })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InstallerError::SubprocessFailure {
                code: output.status.code(),
                detail: format!(
                    "STDOUT:\n{}\nSTDERR:\n{}",
                    tail(&stdout, OUTPUT_TAIL_CHARS),
                    tail(&stderr, OUTPUT_TAIL_CHARS)
                ),
            });
        }

        debug!("Mod-loader installer finished");
        Ok(())
    }
}

fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text.trim_end();
    }
    let skip = count - max_chars;
    let start = text
        .char_indices()
        .nth(skip)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    text[start..].trim_end()
}
