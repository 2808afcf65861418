use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::core::error::InstallerResult;
use crate::core::install::{InstallEvent, InstallObserver, InstallPipeline, InstallReport};
use crate::core::paths::PathResolver;
use crate::core::settings::InstallerSettings;

/// Downloads a modpack archive and installs it into the Minecraft launcher.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct InstallArgs {
    /// Modpack download link (`.zip` URL or Dropbox `?dl=1` link)
    pub link: String,

    /// Settings file to read overrides from
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Directory the scratch area is created in (as `modpackInstaller/`)
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Launcher directory holding `launcher_profiles.json`
    #[arg(long, value_name = "DIR")]
    pub launcher_dir: Option<PathBuf>,

    /// Directory new game directories are created under
    #[arg(long, value_name = "DIR")]
    pub game_root: Option<PathBuf>,

    /// Java executable used to run the mod-loader installer
    #[arg(long, value_name = "PATH")]
    pub java: Option<PathBuf>,
}

impl InstallArgs {
    /// Settings from disk with command-line overrides applied on top.
    pub fn resolve_settings(&self) -> InstallerSettings {
        let path = self
            .settings
            .clone()
            .unwrap_or_else(InstallerSettings::default_path);
        let mut settings = InstallerSettings::load_or_default(&path);

        if let Some(dir) = &self.staging_dir {
            settings.staging_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.launcher_dir {
            settings.launcher_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.game_root {
            settings.game_root = Some(dir.clone());
        }
        if let Some(java) = &self.java {
            settings.java_path = Some(java.clone());
        }
        settings
    }
}

/// Prints every status line to stdout.
pub struct ConsoleObserver;

impl InstallObserver for ConsoleObserver {
    fn on_event(&self, event: &InstallEvent) {
        if let InstallEvent::Busy(busy) = event {
            debug!("Busy indicator: {}", busy);
        }
        if let Some(line) = event.status_line() {
            println!("{line}");
        }
    }
}

/// Runs one install; Ctrl-C cancels it and rolls back.
pub async fn install_modpack(args: InstallArgs) -> InstallerResult<InstallReport> {
    let settings = args.resolve_settings();
    let paths = PathResolver::detect(&settings);
    info!(
        "Platform {:?}: staging {:?}, launcher {:?}, games {:?}",
        paths.platform(),
        paths.staging_root(),
        paths.launcher_root(),
        paths.game_root()
    );

    let pipeline =
        InstallPipeline::new(paths, &settings)?.with_observer(Arc::new(ConsoleObserver));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling install");
            on_interrupt.cancel();
        }
    });

    let result = pipeline.install(&args.link, cancel).await;
    interrupt.abort();

    match &result {
        Ok(report) => info!(
            "Profile '{}' registered as '{}'",
            report.profile_name, report.registry_key
        ),
        Err(e) => error!("{}", e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings_file() {
        let tmp = tempfile::tempdir().unwrap();
        let settings_path = tmp.path().join("settings.json");
        std::fs::write(
            &settings_path,
            r#"{"java_path":"/from/file/java","launcher_dir":"/from/file/mc"}"#,
        )
        .unwrap();

        let args = InstallArgs::parse_from([
            "modpack-installer",
            "https://example.com/pack.zip",
            "--settings",
            settings_path.to_str().unwrap(),
            "--java",
            "/from/flag/java",
        ]);
        let settings = args.resolve_settings();

        assert_eq!(settings.java_path, Some(PathBuf::from("/from/flag/java")));
        assert_eq!(settings.launcher_dir, Some(PathBuf::from("/from/file/mc")));
    }

    #[test]
    fn link_is_required() {
        assert!(InstallArgs::try_parse_from(["modpack-installer"]).is_err());
    }
}
