use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use super::context::{InstallAttempt, InstallReport};
use super::game_dir::{place_modpack, Placement};
use super::observer::{InstallEvent, InstallObserver, NoopObserver};
use super::stage::Stage;
use crate::core::archive;
use crate::core::downloader::{ArchiveFetcher, Downloader};
use crate::core::error::{InstallerError, InstallerResult};
use crate::core::java::RuntimeLocator;
use crate::core::link::DownloadLink;
use crate::core::loaders::{JavaInstallerRunner, ModloaderRunner};
use crate::core::modpack::{ModpackLayout, ModpackValidator, ProfileTransformer};
use crate::core::paths::PathResolver;
use crate::core::profiles::LauncherProfileStore;
use crate::core::settings::InstallerSettings;
use crate::core::staging::StagingArea;

/// Runs one install attempt through every [`Stage`] in order and rolls back
/// on the first failure.
pub struct InstallPipeline {
    staging: StagingArea,
    transformer: ProfileTransformer,
    store: LauncherProfileStore,
    java: RuntimeLocator,
    fetcher: Arc<dyn ArchiveFetcher>,
    runner: Arc<dyn ModloaderRunner>,
    observer: Arc<dyn InstallObserver>,
}

impl InstallPipeline {
    /// Pipeline with the real HTTP downloader and Java process runner.
    pub fn new(paths: PathResolver, settings: &InstallerSettings) -> InstallerResult<Self> {
        Ok(Self {
            staging: StagingArea::new(paths.clone()),
            transformer: ProfileTransformer::new(&paths),
            store: LauncherProfileStore::new(&paths),
            java: RuntimeLocator::new(&paths, settings.java_path.clone()),
            fetcher: Arc::new(Downloader::new()?),
            runner: Arc::new(JavaInstallerRunner),
            observer: Arc::new(NoopObserver),
        })
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn ArchiveFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn ModloaderRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn InstallObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// Installs the modpack behind `raw_link`.
    ///
    /// On failure every partial change this attempt made is undone before the
    /// original error is returned. Firing `cancel` before the profile is
    /// registered stops the current stage and rolls back with
    /// [`InstallerError::Cancelled`]; after that the install finishes.
    pub async fn install(
        &self,
        raw_link: &str,
        cancel: CancellationToken,
    ) -> InstallerResult<InstallReport> {
        let mut attempt = InstallAttempt::new(raw_link, self.staging.root());
        let span = info_span!("install", attempt = %attempt.id);

        async {
            info!("Installing modpack from {:?}", raw_link);
            self.emit(InstallEvent::Busy(true));

            let result = self.drive(&mut attempt, &cancel).await.and_then(|()| {
                attempt
                    .report()
                    .ok_or_else(|| InstallerError::Other("Install finished without a profile".into()))
            });

            match result {
                Ok(report) => {
                    info!(
                        "Installed '{}' into {:?}",
                        report.profile_name, report.game_dir
                    );
                    self.emit(InstallEvent::Succeeded);
                    self.emit(InstallEvent::Busy(false));
                    Ok(report)
                }
                Err(error) => {
                    warn!("Install failed during {}: {}", attempt.stage, error);
                    self.rollback(&mut attempt).await;
                    self.emit(InstallEvent::Failed(error.status_message()));
                    self.emit(InstallEvent::Busy(false));
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn drive(
        &self,
        attempt: &mut InstallAttempt,
        cancel: &CancellationToken,
    ) -> InstallerResult<()> {
        while let Some(stage) = attempt.stage.next() {
            attempt.stage = stage;
            debug!("Entering stage {}", stage);
            self.emit(InstallEvent::Stage(stage));
            if stage.is_terminal() {
                break;
            }

            if runs_to_completion(stage) {
                self.run_stage(stage, attempt, cancel).await?;
            } else {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(InstallerError::Cancelled),
                    result = self.run_stage(stage, attempt, cancel) => result?,
                }
            }
        }
        Ok(())
    }

    async fn run_stage(
        &self,
        stage: Stage,
        attempt: &mut InstallAttempt,
        cancel: &CancellationToken,
    ) -> InstallerResult<()> {
        let layout = ModpackLayout::new(self.staging.extracted_root());

        match stage {
            Stage::Idle | Stage::Done | Stage::RollingBack => Ok(()),

            Stage::Preparing => {
                // Leftovers of an interrupted run must never reach the validator.
                self.staging.clean().await?;
                self.staging.ensure().await?;
                attempt.link = Some(DownloadLink::parse(&attempt.raw_link)?);
                Ok(())
            }

            Stage::Downloading => {
                let link = attempt
                    .link
                    .as_ref()
                    .ok_or_else(|| InstallerError::Other("No validated link".into()))?;
                self.fetcher
                    .fetch(
                        link,
                        &self.staging.archive_path(),
                        self.observer.as_ref(),
                        cancel,
                    )
                    .await
            }

            Stage::Extracting => {
                archive::extract_zip(&self.staging.archive_path(), &attempt.working_dir, cancel)
                    .await
            }

            Stage::Verifying => {
                if ModpackValidator::validate(layout.root()) {
                    Ok(())
                } else {
                    Err(InstallerError::InvalidModpack(layout.root().to_path_buf()))
                }
            }

            Stage::Moving => {
                let profile = self
                    .transformer
                    .transform_file(&layout.profile_path())
                    .await?;
                attempt.owns_game_dir = !profile.game_dir.exists();
                let game_dir = profile.game_dir.clone();
                attempt.profile = Some(profile);

                let placement: Placement = place_modpack(&layout, &game_dir, cancel).await?;
                attempt.placement = Some(placement);
                Ok(())
            }

            Stage::InstallingModloader => {
                let java = self.java.resolve();
                self.runner
                    .run(&java, &layout.installer_jar(), &attempt.working_dir)
                    .await
            }

            Stage::InstallingProfile => {
                let profile = attempt
                    .profile
                    .as_ref()
                    .ok_or_else(|| InstallerError::Other("No profile to register".into()))?;
                attempt.registry_key = Some(self.store.upsert(profile).await?);
                Ok(())
            }

            Stage::CleaningUp => {
                // The install has landed; leftover scratch files are not a failure.
                if let Err(e) = self.staging.clean().await {
                    warn!("Could not clean staging area: {}", e);
                }
                Ok(())
            }
        }
    }

    /// Best-effort undo. Never fails, so the caller's error is what gets reported.
    async fn rollback(&self, attempt: &mut InstallAttempt) {
        attempt.stage = Stage::RollingBack;
        self.emit(InstallEvent::Stage(Stage::RollingBack));

        if let Some(profile) = &attempt.profile {
            if attempt.owns_game_dir {
                match tokio::fs::remove_dir_all(&profile.game_dir).await {
                    Ok(()) => info!("Removed partial game directory {:?}", profile.game_dir),
                    Err(e) => warn!(
                        "Could not remove partial game directory {:?}: {}",
                        profile.game_dir, e
                    ),
                }
            }
        }

        if let Err(e) = self.staging.clean().await {
            warn!("Could not clean staging area during rollback: {}", e);
        }
    }

    fn emit(&self, event: InstallEvent) {
        self.observer.on_event(&event);
    }
}

/// Stages that are awaited even after `cancel` fires instead of being dropped.
///
/// Extraction and placement run on blocking threads that outlive a dropped
/// future, so they watch the token themselves. Registering the profile
/// commits the install; from there on it finishes regardless.
fn runs_to_completion(stage: Stage) -> bool {
    matches!(
        stage,
        Stage::Extracting | Stage::Moving | Stage::InstallingProfile | Stage::CleaningUp
    )
}
