#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use modpack_installer_lib::core::downloader::ArchiveFetcher;
use modpack_installer_lib::core::error::{InstallerError, InstallerResult};
use modpack_installer_lib::core::install::{InstallEvent, InstallObserver, InstallPipeline, Stage};
use modpack_installer_lib::core::java::JavaRuntime;
use modpack_installer_lib::core::link::DownloadLink;
use modpack_installer_lib::core::loaders::ModloaderRunner;
use modpack_installer_lib::core::paths::{PathResolver, Platform};
use modpack_installer_lib::core::settings::InstallerSettings;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use zip::write::SimpleFileOptions;

pub const PROFILE_JSON: &str =
    r#"{"profiles":{"profile":{"name":"My Pack","gameDir":"mypack","lastVersionId":"1.20.1-forge-47.2.0"}}}"#;

pub const REGISTRY_JSON: &str = r#"{
  "profiles": {
    "a": {"name": "A", "type": "latest-release"},
    "b": {"name": "B", "gameDir": "/somewhere/b"}
  },
  "settings": {"keepLauncherOpen": false},
  "version": 3
}"#;

/// Throwaway home/app-data layout with a launcher registry in place.
pub struct TestEnv {
    pub tmp: TempDir,
    pub paths: PathResolver,
    pub settings: InstallerSettings,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let settings = InstallerSettings {
            game_root: Some(tmp.path().join("games/mc")),
            java_path: Some(PathBuf::from("/opt/test/java")),
            ..Default::default()
        };
        let paths = PathResolver::for_platform(
            Platform::Unix,
            &tmp.path().join("support"),
            &tmp.path().join("home"),
        )
        .with_overrides(&settings);

        std::fs::create_dir_all(paths.launcher_root()).unwrap();
        std::fs::write(paths.profile_registry(), REGISTRY_JSON).unwrap();
        std::fs::create_dir_all(paths.game_root()).unwrap();

        Self {
            tmp,
            paths,
            settings,
        }
    }

    pub fn game_dir(&self) -> PathBuf {
        self.paths.game_root().join("mypack")
    }

    pub fn registry(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.paths.profile_registry()).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    pub fn pipeline(
        &self,
        fetcher: Arc<dyn ArchiveFetcher>,
        runner: Arc<dyn ModloaderRunner>,
        observer: Arc<dyn InstallObserver>,
    ) -> InstallPipeline {
        InstallPipeline::new(self.paths.clone(), &self.settings)
            .unwrap()
            .with_fetcher(fetcher)
            .with_runner(runner)
            .with_observer(observer)
    }
}

/// Builds a zip archive in memory. Names ending in `/` become directories.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(name.trim_end_matches('/'), SimpleFileOptions::default())
                .unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

pub fn complete_modpack() -> Vec<u8> {
    zip_bytes(&[
        ("modpack/installer/profile.json", PROFILE_JSON),
        ("modpack/installer/installer.jar", "PK-jar"),
        ("modpack/mods/pack-mod.jar", "mod"),
        ("modpack/config/pack.toml", "cfg"),
    ])
}

/// Serves a fixed archive and counts how often it was asked to.
pub struct FakeFetcher {
    archive: Vec<u8>,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn serving(archive: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            archive,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArchiveFetcher for FakeFetcher {
    async fn fetch(
        &self,
        _link: &DownloadLink,
        dest: &Path,
        _observer: &dyn InstallObserver,
        _cancel: &CancellationToken,
    ) -> InstallerResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::fs::write(dest, &self.archive).map_err(|e| InstallerError::io(dest, e))
    }
}

/// Fails every download with an HTTP error status.
pub struct FailingFetcher;

#[async_trait]
impl ArchiveFetcher for FailingFetcher {
    async fn fetch(
        &self,
        link: &DownloadLink,
        _dest: &Path,
        _observer: &dyn InstallObserver,
        _cancel: &CancellationToken,
    ) -> InstallerResult<()> {
        Err(InstallerError::DownloadFailed {
            url: link.to_string(),
            status: 404,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RunnerCall {
    pub java: PathBuf,
    pub installer_jar: PathBuf,
    pub working_dir: PathBuf,
    pub jar_existed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerBehavior {
    Succeed,
    Fail,
    /// Removes the target game directory, then fails.
    FailAfterDeleting,
    /// Never completes.
    Hang,
}

pub struct FakeRunner {
    behavior: RunnerBehavior,
    game_dir: PathBuf,
    pub calls: Mutex<Vec<RunnerCall>>,
}

impl FakeRunner {
    pub fn new(behavior: RunnerBehavior, game_dir: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            game_dir,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RunnerCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModloaderRunner for FakeRunner {
    async fn run(
        &self,
        java: &JavaRuntime,
        installer_jar: &Path,
        working_dir: &Path,
    ) -> InstallerResult<()> {
        self.calls.lock().unwrap().push(RunnerCall {
            java: java.program().to_path_buf(),
            installer_jar: installer_jar.to_path_buf(),
            working_dir: working_dir.to_path_buf(),
            jar_existed: installer_jar.is_file(),
        });

        let failure = || InstallerError::SubprocessFailure {
            code: Some(1),
            detail: "installer crashed".into(),
        };
        match self.behavior {
            RunnerBehavior::Succeed => Ok(()),
            RunnerBehavior::Fail => Err(failure()),
            RunnerBehavior::FailAfterDeleting => {
                let _ = std::fs::remove_dir_all(&self.game_dir);
                Err(failure())
            }
            RunnerBehavior::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

/// Keeps every event in memory, in order.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<InstallEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<InstallEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn status_lines(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(InstallEvent::status_line)
            .collect()
    }
}

impl InstallObserver for RecordingObserver {
    fn on_event(&self, event: &InstallEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Fires `cancel` as soon as `stage` is entered.
pub struct CancelOnStage {
    pub stage: Stage,
    pub cancel: CancellationToken,
}

impl InstallObserver for CancelOnStage {
    fn on_event(&self, event: &InstallEvent) {
        if *event == InstallEvent::Stage(self.stage) {
            self.cancel.cancel();
        }
    }
}

pub fn recorder() -> Arc<RecordingObserver> {
    Arc::new(RecordingObserver::default())
}
